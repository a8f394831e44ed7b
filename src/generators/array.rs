//! Array generator.
//!
//! Matches any array type whose component type the registry supports. The
//! component descriptor is taken from a generic-array declaration when one
//! is supplied, otherwise from the raw component type.

use crate::composition;
use crate::error::GenerationError;
use crate::generator::{envelope, priority, Generator, ParameterizableGenerator};
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::{RawType, TypeDescriptor};
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct ArrayGenerator;

impl ArrayGenerator {
    pub fn new() -> Self {
        ArrayGenerator
    }

    fn component_of(ty: &RawType, params: &GenerationParameters) -> Option<TypeDescriptor> {
        params
            .element_type()
            .cloned()
            .or_else(|| ty.component().cloned().map(TypeDescriptor::Simple))
    }
}

impl Generator for ArrayGenerator {
    fn name(&self) -> &str {
        "ArrayGenerator"
    }

    fn priority(&self) -> i32 {
        priority::GENERIC_GENERATORS
    }

    fn supports(&self, ty: &RawType, registry: &GeneratorRegistry) -> bool {
        ty.component()
            .map_or(false, |component| registry.supports(component))
    }

    fn default_value(&self, ty: &RawType, registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        self.default_value_with(ty, &self.create_parameters(), registry)
    }

    fn random_value(&self, ty: &RawType, registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        self.random_value_with(ty, &self.create_parameters(), registry)
    }

    fn nullable_default_value(
        &self,
        ty: &RawType,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        self.nullable_default_value_with(ty, &self.create_parameters(), registry)
    }

    fn nullable_random_value(
        &self,
        ty: &RawType,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        self.nullable_random_value_with(ty, &self.create_parameters(), registry)
    }

    fn as_parameterizable(&self) -> Option<&dyn ParameterizableGenerator> {
        Some(self)
    }
}

impl ParameterizableGenerator for ArrayGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::collection()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let component = Self::component_of(ty, params);
        let size = composition::default_size(params, registry.config().collections)?;
        let elements = composition::fill(size, || {
            composition::default_component(registry, component.as_ref())
        })?;
        Ok(Value::Array(elements))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let component = Self::component_of(ty, params);
        let size = composition::random_size(params, registry.config().collections)?;
        let elements = composition::fill(size, || {
            composition::component(registry, component.as_ref(), params.is_nullable())
        })?;
        Ok(Value::Array(elements))
    }
}
