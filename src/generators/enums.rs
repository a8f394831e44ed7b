//! Enumeration generator.

use crate::error::GenerationError;
use crate::generator::{envelope, priority, Generator, ParameterizableGenerator};
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::{EnumValue, Value};
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Generator for one registered enumeration.
///
/// The default is the first variant. An enumeration without variants is
/// not supported.
#[derive(Debug, Clone)]
pub struct EnumGenerator {
    ty: RawType,
    variants: Vec<Arc<str>>,
    priority: i32,
}

impl EnumGenerator {
    pub fn new<V: AsRef<str>>(ty: impl Into<RawType>, variants: impl IntoIterator<Item = V>) -> Self {
        Self {
            ty: ty.into(),
            variants: variants.into_iter().map(|v| Arc::from(v.as_ref())).collect(),
            priority: priority::GENERIC_GENERATORS,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn variants(&self) -> &[Arc<str>] {
        &self.variants
    }

    fn value(&self, variant: &Arc<str>) -> Value {
        Value::Enum(EnumValue {
            ty: self.ty.clone(),
            variant: variant.clone(),
        })
    }
}

impl Generator for EnumGenerator {
    fn name(&self) -> &str {
        "EnumGenerator"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn exact_types(&self) -> Vec<RawType> {
        if self.variants.is_empty() {
            Vec::new()
        } else {
            vec![self.ty.clone()]
        }
    }

    fn supports(&self, ty: &RawType, _registry: &GeneratorRegistry) -> bool {
        ty == &self.ty && !self.variants.is_empty()
    }

    fn default_value(&self, ty: &RawType, registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        self.variants
            .first()
            .map(|variant| self.value(variant))
            .ok_or_else(|| GenerationError::UnsupportedValueType(ty.clone()))
    }

    fn random_value(&self, ty: &RawType, registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        self.variants
            .choose(&mut rand::thread_rng())
            .map(|variant| self.value(variant))
            .ok_or_else(|| GenerationError::UnsupportedValueType(ty.clone()))
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

impl ParameterizableGenerator for EnumGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::default()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        self.default_value(ty, registry)
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        self.random_value(ty, registry)
    }
}
