//! Targeted generators
//!
//! A [`TargetedGenerator`] binds a resolved generator to one call site. Its
//! parameter sources are the declared type followed by the constraints the
//! metadata provider reports for the site and the requested groups.

use super::{Generator, Request};
use crate::error::GenerationError;
use crate::metadata::{ExecutableId, Group, MetadataSource, TargetSite};
use crate::registry::GeneratorRegistry;
use crate::types::{RawType, TypeDescriptor};
use crate::value::Value;
use std::sync::Arc;
use tracing::trace;

/// Generator bound to a property, an executable parameter or an executable
/// return value.
#[derive(Debug, Clone)]
pub struct TargetedGenerator {
    site: TargetSite,
    declared: TypeDescriptor,
    generator: Arc<dyn Generator>,
}

impl TargetedGenerator {
    /// Bind the registry's generator for `declared` to `site`.
    pub fn resolve(
        registry: &GeneratorRegistry,
        site: TargetSite,
        declared: TypeDescriptor,
    ) -> Result<Self, GenerationError> {
        let generator = registry.get_generator(&declared.raw_type())?;
        Ok(Self {
            site,
            declared,
            generator,
        })
    }

    /// Site whose declared type is recorded by the metadata provider.
    pub fn for_site(registry: &GeneratorRegistry, site: TargetSite) -> Result<Self, GenerationError> {
        let declared = registry.metadata().declared_type(&site).ok_or_else(|| {
            GenerationError::configuration(format!("No declared type for {}", site))
        })?;
        Self::resolve(registry, site, declared)
    }

    pub fn for_property(
        registry: &GeneratorRegistry,
        owner: impl Into<RawType>,
        name: impl AsRef<str>,
    ) -> Result<Self, GenerationError> {
        Self::for_site(registry, TargetSite::property(owner, name))
    }

    pub fn for_parameter(
        registry: &GeneratorRegistry,
        executable: ExecutableId,
        index: usize,
    ) -> Result<Self, GenerationError> {
        Self::for_site(registry, TargetSite::parameter(executable, index))
    }

    pub fn for_return_value(
        registry: &GeneratorRegistry,
        executable: ExecutableId,
    ) -> Result<Self, GenerationError> {
        Self::for_site(registry, TargetSite::return_value(executable))
    }

    pub fn site(&self) -> &TargetSite {
        &self.site
    }

    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.declared
    }

    pub fn generator(&self) -> &Arc<dyn Generator> {
        &self.generator
    }

    /// `[TypeDeclaration(declared)] + constraints_at(site, groups)`
    pub fn sources(&self, registry: &GeneratorRegistry, groups: &[Group]) -> Vec<MetadataSource> {
        let constraints = registry.metadata().constraints_at(&self.site, groups);
        let mut sources = Vec::with_capacity(constraints.len() + 1);
        sources.push(MetadataSource::TypeDeclaration(self.declared.clone()));
        sources.extend(constraints.into_iter().map(MetadataSource::Constraint));
        sources
    }

    pub fn default_value(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
    ) -> Result<Value, GenerationError> {
        self.generate(registry, groups, Request::Default)
    }

    pub fn nullable_default_value(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
    ) -> Result<Value, GenerationError> {
        self.generate(registry, groups, Request::NullableDefault)
    }

    pub fn random_value(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
    ) -> Result<Value, GenerationError> {
        self.generate(registry, groups, Request::Random)
    }

    pub fn nullable_random_value(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
    ) -> Result<Value, GenerationError> {
        self.generate(registry, groups, Request::NullableRandom)
    }

    fn generate(
        &self,
        registry: &GeneratorRegistry,
        groups: &[Group],
        request: Request,
    ) -> Result<Value, GenerationError> {
        let raw = self.declared.raw_type();
        trace!(site = %self.site, request = ?request, "Generating targeted value");
        match self.generator.as_parameterizable() {
            Some(parameterizable) => {
                let params = registry.build_parameters(
                    parameterizable.create_parameters(),
                    &self.sources(registry, groups),
                )?;
                request.invoke_with(parameterizable, &raw, &params, registry)
            }
            None => request.invoke(self.generator.as_ref(), &raw, registry),
        }
    }
}
