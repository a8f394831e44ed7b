//! Constraint Extraction
//!
//! A [`ParametersSourceExtractor`] folds one kind of metadata source into a
//! parameter object. The [`ExtractorRegistry`] assembles, per capability set,
//! a [`ParametersExtractor`] pipeline of every compatible extractor ordered by
//! descending priority, then by source specificity, then by registration
//! order.

use crate::error::GenerationError;
use crate::metadata::{MetadataSource, SourceKind};
use crate::params::{Capability, CapabilitySet, GenerationParameters};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

pub mod builtins;

pub use builtins::NopExtractor;

/// Strategy merging one metadata source into a parameter object.
pub trait ParametersSourceExtractor: Send + Sync + fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    /// Capability written by this extractor; `None` targets any parameter
    /// object.
    fn capability(&self) -> Option<Capability>;

    /// Kind of source this extractor reads.
    fn source_kind(&self) -> SourceKind;

    /// Structural check on a candidate source.
    fn accepts(&self, source: &MetadataSource) -> bool;

    /// Merge `source` into `target`.
    ///
    /// Sources of an unsupported shape are a configuration error.
    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError>;
}

/// Rank of a source kind; narrower sources run first among equal priorities.
fn specificity(kind: SourceKind) -> u8 {
    match kind {
        SourceKind::Constraint => 3,
        SourceKind::TypeDeclaration => 2,
        SourceKind::Parameters => 1,
        SourceKind::Custom => 0,
    }
}

/// Ordered extraction pipeline for one capability set.
#[derive(Debug, Clone, Default)]
pub struct ParametersExtractor {
    extractors: Vec<Arc<dyn ParametersSourceExtractor>>,
}

impl ParametersExtractor {
    /// Pipeline over extractors already in execution order.
    pub fn new(extractors: Vec<Arc<dyn ParametersSourceExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn extractors(&self) -> &[Arc<dyn ParametersSourceExtractor>] {
        &self.extractors
    }

    /// Fold every source, in caller order, through the accepting extractors.
    /// Sources no extractor accepts are ignored.
    pub fn extract_parameters(
        &self,
        params: &mut GenerationParameters,
        sources: &[MetadataSource],
    ) -> Result<(), GenerationError> {
        for source in sources {
            for extractor in self.extractors.iter().filter(|e| e.accepts(source)) {
                trace!(
                    extractor = extractor.name(),
                    source = ?source.kind(),
                    "Extracting generation parameters"
                );
                extractor.extract(source, params)?;
            }
        }
        Ok(())
    }
}

struct ExtractorEntry {
    extractor: Arc<dyn ParametersSourceExtractor>,
    order: usize,
}

/// Immutable registration snapshot with its own pipeline cache.
struct ExtractorCatalog {
    entries: Vec<ExtractorEntry>,
    cache: RwLock<HashMap<CapabilitySet, Arc<ParametersExtractor>>>,
}

impl ExtractorCatalog {
    fn new(extractors: impl IntoIterator<Item = Arc<dyn ParametersSourceExtractor>>) -> Self {
        let entries = extractors
            .into_iter()
            .enumerate()
            .map(|(order, extractor)| ExtractorEntry { extractor, order })
            .collect();
        Self {
            entries,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn extended(&self, extractor: Arc<dyn ParametersSourceExtractor>) -> Self {
        let existing = self.entries.iter().map(|e| e.extractor.clone());
        Self::new(existing.chain(std::iter::once(extractor)))
    }

    fn pipeline(&self, capabilities: CapabilitySet) -> Arc<ParametersExtractor> {
        if let Some(cached) = self.cache.read().get(&capabilities) {
            return cached.clone();
        }

        let mut compatible: Vec<&ExtractorEntry> = self
            .entries
            .iter()
            .filter(|e| {
                e.extractor
                    .capability()
                    .map_or(true, |c| capabilities.contains(c))
            })
            .collect();
        compatible.sort_by(|a, b| {
            b.extractor
                .priority()
                .cmp(&a.extractor.priority())
                .then_with(|| {
                    specificity(b.extractor.source_kind())
                        .cmp(&specificity(a.extractor.source_kind()))
                })
                .then_with(|| a.order.cmp(&b.order))
        });

        let pipeline = Arc::new(ParametersExtractor::new(
            compatible.into_iter().map(|e| e.extractor.clone()).collect(),
        ));
        debug!(
            capabilities = ?capabilities,
            extractors = pipeline.extractors().len(),
            "Built extraction pipeline"
        );
        self.cache.write().insert(capabilities, pipeline.clone());
        pipeline
    }
}

/// Catalog of source extractors with full-reset semantics.
pub struct ExtractorRegistry {
    baseline: Vec<Arc<dyn ParametersSourceExtractor>>,
    catalog: RwLock<Arc<ExtractorCatalog>>,
}

impl ExtractorRegistry {
    /// Registry whose baseline is the built-in extractor set.
    pub fn new() -> Self {
        Self::with_baseline(builtins::baseline())
    }

    /// Registry with an explicit baseline.
    pub fn with_baseline(baseline: Vec<Arc<dyn ParametersSourceExtractor>>) -> Self {
        let catalog = Arc::new(ExtractorCatalog::new(baseline.clone()));
        Self {
            baseline,
            catalog: RwLock::new(catalog),
        }
    }

    /// Add an extractor; invalidates every cached pipeline.
    pub fn register(&self, extractor: Arc<dyn ParametersSourceExtractor>) {
        let mut catalog = self.catalog.write();
        debug!(extractor = extractor.name(), "Registering parameters extractor");
        *catalog = Arc::new(catalog.extended(extractor));
    }

    /// Restore the baseline and drop cached pipelines.
    pub fn reset(&self) {
        let mut catalog = self.catalog.write();
        *catalog = Arc::new(ExtractorCatalog::new(self.baseline.clone()));
    }

    /// Registered extractors in registration order.
    pub fn registered(&self) -> Vec<Arc<dyn ParametersSourceExtractor>> {
        self.snapshot()
            .entries
            .iter()
            .map(|e| e.extractor.clone())
            .collect()
    }

    /// Pipeline for parameter objects declaring `capabilities`.
    pub fn pipeline(&self, capabilities: CapabilitySet) -> Arc<ParametersExtractor> {
        self.snapshot().pipeline(capabilities)
    }

    /// Fold `sources` into `params` with the matching pipeline.
    pub fn build_parameters(
        &self,
        mut params: GenerationParameters,
        sources: &[MetadataSource],
    ) -> Result<GenerationParameters, GenerationError> {
        self.pipeline(params.capabilities())
            .extract_parameters(&mut params, sources)?;
        Ok(params)
    }

    fn snapshot(&self) -> Arc<ExtractorCatalog> {
        self.catalog.read().clone()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("registered", &self.snapshot().entries.len())
            .finish()
    }
}
