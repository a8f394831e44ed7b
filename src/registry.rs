//! Generator Registry
//!
//! Catalog of generators and the public synthesis API. Resolution picks, among
//! the generators supporting a raw type, the one with the highest priority;
//! ties go to the first registered. Generators declaring exact types are
//! found through an index, the rest by a structural scan.
//!
//! The catalog is an immutable snapshot swapped on `register` and `reset`.
//! Each snapshot owns its resolution cache, so a mutation invalidates every
//! cached outcome at once. Readers never hold a lock while a generator runs.

use crate::config::GeneratorsConfig;
use crate::error::GenerationError;
use crate::extract::{ExtractorRegistry, ParametersSourceExtractor};
use crate::generator::{Executable, ExecutableGenerator, Generator, Request, TargetedGenerator};
use crate::generators;
use crate::metadata::{MetadataCatalog, MetadataProvider, MetadataSource, TargetSite};
use crate::params::GenerationParameters;
use crate::types::{RawType, TypeDescriptor};
use crate::value::Value;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Registration entry
struct GeneratorEntry {
    generator: Arc<dyn Generator>,
    priority: i32,
    order: usize,
}

/// Immutable registration snapshot plus its resolution cache.
struct GeneratorCatalog {
    entries: Vec<GeneratorEntry>,
    exact: HashMap<RawType, Vec<usize>>,
    structural: Vec<usize>,
    cache: RwLock<HashMap<RawType, Option<Arc<dyn Generator>>>>,
}

impl GeneratorCatalog {
    fn new(generators: impl IntoIterator<Item = Arc<dyn Generator>>) -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
            exact: HashMap::new(),
            structural: Vec::new(),
            cache: RwLock::new(HashMap::new()),
        };
        for generator in generators {
            catalog.push(generator);
        }
        catalog
    }

    fn push(&mut self, generator: Arc<dyn Generator>) {
        let index = self.entries.len();
        let exact_types = generator.exact_types();
        if exact_types.is_empty() {
            self.structural.push(index);
        } else {
            for ty in exact_types {
                self.exact.entry(ty).or_default().push(index);
            }
        }
        self.entries.push(GeneratorEntry {
            priority: generator.priority(),
            generator,
            order: index,
        });
    }

    fn extended(&self, generator: Arc<dyn Generator>) -> Self {
        let existing = self.entries.iter().map(|e| e.generator.clone());
        Self::new(existing.chain(std::iter::once(generator)))
    }

    fn resolve(&self, ty: &RawType, registry: &GeneratorRegistry) -> Option<Arc<dyn Generator>> {
        if let Some(cached) = self.cache.read().get(ty) {
            return cached.clone();
        }

        let exact = self.exact.get(ty).into_iter().flatten().copied();
        let structural = self
            .structural
            .iter()
            .copied()
            .filter(|&i| self.entries[i].generator.supports(ty, registry));
        let best = exact
            .chain(structural)
            .map(|i| &self.entries[i])
            .max_by(|a, b| {
                a.priority
                    .cmp(&b.priority)
                    .then_with(|| b.order.cmp(&a.order))
            })
            .map(|entry| entry.generator.clone());

        debug!(
            ty = %ty,
            generator = best.as_ref().map(|g| g.name()).unwrap_or("<none>"),
            "Resolved generator"
        );
        self.cache.write().insert(ty.clone(), best.clone());
        best
    }
}

/// Generator catalog and synthesis entry point.
///
/// Constructed once per test run (or per test) and shared by reference;
/// `register` and `reset` are serialized by a write lock.
pub struct GeneratorRegistry {
    config: GeneratorsConfig,
    metadata: Arc<dyn MetadataProvider>,
    extractors: ExtractorRegistry,
    baseline: Vec<Arc<dyn Generator>>,
    catalog: RwLock<Arc<GeneratorCatalog>>,
}

impl GeneratorRegistry {
    /// Registry with default configuration, an empty metadata catalog and
    /// the built-in baseline.
    pub fn new() -> Self {
        Self::from_parts(
            GeneratorsConfig::default(),
            Arc::new(MetadataCatalog::new()),
            generators::baseline(),
            ExtractorRegistry::new(),
        )
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn from_parts(
        config: GeneratorsConfig,
        metadata: Arc<dyn MetadataProvider>,
        baseline: Vec<Arc<dyn Generator>>,
        extractors: ExtractorRegistry,
    ) -> Self {
        let catalog = Arc::new(GeneratorCatalog::new(baseline.clone()));
        Self {
            config,
            metadata,
            extractors,
            baseline,
            catalog: RwLock::new(catalog),
        }
    }

    pub fn config(&self) -> &GeneratorsConfig {
        &self.config
    }

    pub fn null_probability(&self) -> f64 {
        self.config.null_probability
    }

    /// Metadata source provider consulted by targeted generators.
    pub fn metadata(&self) -> &Arc<dyn MetadataProvider> {
        &self.metadata
    }

    pub fn extractors(&self) -> &ExtractorRegistry {
        &self.extractors
    }

    // Catalog management

    /// Add a generator. Invalidates the resolution cache.
    pub fn register(&self, generator: Arc<dyn Generator>) {
        let mut catalog = self.catalog.write();
        debug!(
            generator = generator.name(),
            priority = generator.priority(),
            "Registering generator"
        );
        *catalog = Arc::new(catalog.extended(generator));
    }

    /// Register an [`ExecutableGenerator`] for `executable`'s owner type.
    pub fn register_executable(&self, executable: Executable) -> Result<(), GenerationError> {
        let generator = ExecutableGenerator::new(self, executable)?;
        self.register(Arc::new(generator));
        Ok(())
    }

    /// Add a parameters source extractor.
    pub fn register_extractor(&self, extractor: Arc<dyn ParametersSourceExtractor>) {
        self.extractors.register(extractor);
    }

    /// Restore the baseline generators and extractors and clear all caches.
    pub fn reset(&self) {
        let mut catalog = self.catalog.write();
        *catalog = Arc::new(GeneratorCatalog::new(self.baseline.clone()));
        self.extractors.reset();
        debug!(generators = self.baseline.len(), "Registry reset to baseline");
    }

    /// Registered generators in registration order.
    pub fn registered(&self) -> Vec<Arc<dyn Generator>> {
        self.snapshot()
            .entries
            .iter()
            .map(|e| e.generator.clone())
            .collect()
    }

    // Resolution

    /// Best generator for `ty`, if any.
    pub fn resolve(&self, ty: &RawType) -> Option<Arc<dyn Generator>> {
        self.snapshot().resolve(ty, self)
    }

    /// Best generator for `ty` or `UnsupportedValueType`.
    pub fn get_generator(&self, ty: &RawType) -> Result<Arc<dyn Generator>, GenerationError> {
        self.resolve(ty)
            .ok_or_else(|| GenerationError::UnsupportedValueType(ty.clone()))
    }

    pub fn supports(&self, ty: &RawType) -> bool {
        self.resolve(ty).is_some()
    }

    /// Fold `sources` into `params` with the extraction pipeline for its
    /// capabilities.
    pub fn build_parameters(
        &self,
        params: GenerationParameters,
        sources: &[MetadataSource],
    ) -> Result<GenerationParameters, GenerationError> {
        self.extractors.build_parameters(params, sources)
    }

    // Synthesis API

    /// Canonical non-null value.
    pub fn default_value(
        &self,
        ty: &TypeDescriptor,
        sources: &[MetadataSource],
    ) -> Result<Value, GenerationError> {
        self.generate(ty, sources, Request::Default)
    }

    /// Null unless the sources make the request non-nullable.
    pub fn nullable_default_value(
        &self,
        ty: &TypeDescriptor,
        sources: &[MetadataSource],
    ) -> Result<Value, GenerationError> {
        self.generate(ty, sources, Request::NullableDefault)
    }

    /// Random non-null value.
    pub fn random_value(
        &self,
        ty: &TypeDescriptor,
        sources: &[MetadataSource],
    ) -> Result<Value, GenerationError> {
        self.generate(ty, sources, Request::Random)
    }

    /// Random value, null with the configured probability when nullable.
    pub fn nullable_random_value(
        &self,
        ty: &TypeDescriptor,
        sources: &[MetadataSource],
    ) -> Result<Value, GenerationError> {
        self.generate(ty, sources, Request::NullableRandom)
    }

    pub fn default_value_with_params(
        &self,
        ty: &TypeDescriptor,
        params: &GenerationParameters,
    ) -> Result<Value, GenerationError> {
        self.generate(ty, &[params.clone().into()], Request::Default)
    }

    pub fn nullable_default_value_with_params(
        &self,
        ty: &TypeDescriptor,
        params: &GenerationParameters,
    ) -> Result<Value, GenerationError> {
        self.generate(ty, &[params.clone().into()], Request::NullableDefault)
    }

    pub fn random_value_with_params(
        &self,
        ty: &TypeDescriptor,
        params: &GenerationParameters,
    ) -> Result<Value, GenerationError> {
        self.generate(ty, &[params.clone().into()], Request::Random)
    }

    pub fn nullable_random_value_with_params(
        &self,
        ty: &TypeDescriptor,
        params: &GenerationParameters,
    ) -> Result<Value, GenerationError> {
        self.generate(ty, &[params.clone().into()], Request::NullableRandom)
    }

    /// Targeted generator for a site whose declared type the metadata
    /// provider knows.
    pub fn targeted(&self, site: TargetSite) -> Result<TargetedGenerator, GenerationError> {
        TargetedGenerator::for_site(self, site)
    }

    fn generate(
        &self,
        ty: &TypeDescriptor,
        sources: &[MetadataSource],
        request: Request,
    ) -> Result<Value, GenerationError> {
        let raw = ty.raw_type();
        let generator = self.get_generator(&raw)?;
        trace!(ty = %ty, generator = generator.name(), request = ?request, "Generating value");
        match generator.as_parameterizable() {
            Some(parameterizable) => {
                let mut all = Vec::with_capacity(sources.len() + 1);
                if ty.has_type_arguments() {
                    all.push(MetadataSource::TypeDeclaration(ty.clone()));
                }
                all.extend_from_slice(sources);
                let params = self.build_parameters(parameterizable.create_parameters(), &all)?;
                request.invoke_with(parameterizable, &raw, &params, self)
            }
            None => request.invoke(generator.as_ref(), &raw, self),
        }
    }

    fn snapshot(&self) -> Arc<GeneratorCatalog> {
        self.catalog.read().clone()
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("config", &self.config)
            .field("registered", &self.snapshot().entries.len())
            .field("extractors", &self.extractors)
            .finish()
    }
}

/// Builder for a [`GeneratorRegistry`].
///
/// Generators and extractors added here become part of the baseline that
/// `reset` restores.
pub struct RegistryBuilder {
    config: GeneratorsConfig,
    metadata: Arc<dyn MetadataProvider>,
    generators: Vec<Arc<dyn Generator>>,
    extractors: Vec<Arc<dyn ParametersSourceExtractor>>,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self {
            config: GeneratorsConfig::default(),
            metadata: Arc::new(MetadataCatalog::new()),
            generators: Vec::new(),
            extractors: Vec::new(),
        }
    }

    pub fn config(mut self, config: GeneratorsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metadata(mut self, metadata: Arc<dyn MetadataProvider>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Extra baseline generator, registered after the built-ins.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generators.push(generator);
        self
    }

    /// Extra baseline extractor, registered after the built-ins.
    pub fn extractor(mut self, extractor: Arc<dyn ParametersSourceExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    /// Validate the configuration and build the registry.
    pub fn build(self) -> Result<GeneratorRegistry, GenerationError> {
        let config = self.config.validated()?;
        let mut baseline = generators::baseline();
        baseline.extend(self.generators);
        let mut extractors = crate::extract::builtins::baseline();
        extractors.extend(self.extractors);
        Ok(GeneratorRegistry::from_parts(
            config,
            self.metadata,
            baseline,
            ExtractorRegistry::with_baseline(extractors),
        ))
    }
}
