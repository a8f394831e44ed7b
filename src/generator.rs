//! Generator Strategies
//!
//! [`Generator`] maps a raw type to default and random values.
//! [`ParameterizableGenerator`] additionally honours a parameter object built
//! from metadata sources. Both receive the [`GeneratorRegistry`] they were
//! resolved from so container and executable generators can recurse into it.
//!
//! Every generator implements only the non-null cases; the nullable variants
//! are supplied by the [`envelope`].

use crate::error::GenerationError;
use crate::metadata::MetadataSource;
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::Value;
use std::fmt;

pub mod envelope;
pub mod executable;
pub mod targeted;

pub use executable::{Executable, ExecutableGenerator, ExecutableKind};
pub use targeted::TargetedGenerator;

/// Generator priorities. Higher wins; ties go to the first registered.
pub mod priority {
    pub const MIN: i32 = i32::MIN;
    /// Structural generators: containers, arrays, enumerations.
    pub const GENERIC_GENERATORS: i32 = -2000;
    /// Built-in leaf generators.
    pub const NATIVE_GENERATORS: i32 = -1000;
    pub const DEFAULT: i32 = 0;
    pub const MAX: i32 = i32::MAX;
}

/// Null probability used by the nullable random variants.
pub const DEFAULT_NULL_PROBABILITY: f64 = 0.3;

/// Value generation strategy for one or more raw types.
pub trait Generator: Send + Sync + fmt::Debug {
    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn priority(&self) -> i32 {
        priority::DEFAULT
    }

    /// Raw types this generator supports by exact match.
    ///
    /// Generators returning an empty list are matched structurally through
    /// [`Generator::supports`].
    fn exact_types(&self) -> Vec<RawType> {
        Vec::new()
    }

    fn supports(&self, ty: &RawType, registry: &GeneratorRegistry) -> bool;

    /// Canonical non-null value.
    fn default_value(&self, ty: &RawType, registry: &GeneratorRegistry)
        -> Result<Value, GenerationError>;

    /// Random non-null value.
    fn random_value(&self, ty: &RawType, registry: &GeneratorRegistry)
        -> Result<Value, GenerationError>;

    /// Null; plain generators are always nullable.
    fn nullable_default_value(
        &self,
        ty: &RawType,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        envelope::nullable_default(true, || self.default_value(ty, registry))
    }

    fn nullable_random_value(
        &self,
        ty: &RawType,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        envelope::nullable_random(true, registry.null_probability(), || {
            self.random_value(ty, registry)
        })
    }

    /// Parameterizable view of this generator, if it has one.
    fn as_parameterizable(&self) -> Option<&dyn ParameterizableGenerator> {
        None
    }
}

/// Generator honouring a parameter object.
pub trait ParameterizableGenerator: Generator {
    /// Empty parameter object declaring the capabilities this generator
    /// understands.
    fn create_parameters(&self) -> GenerationParameters;

    fn default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError>;

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError>;

    fn nullable_default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        envelope::nullable_default(params.is_nullable(), || {
            self.default_value_with(ty, params, registry)
        })
    }

    fn nullable_random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        envelope::nullable_random(params.is_nullable(), registry.null_probability(), || {
            self.random_value_with(ty, params, registry)
        })
    }

    /// Default value with parameters built from `sources`.
    fn default_value_from(
        &self,
        ty: &RawType,
        sources: &[MetadataSource],
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        let params = registry.build_parameters(self.create_parameters(), sources)?;
        self.default_value_with(ty, &params, registry)
    }

    /// Random value with parameters built from `sources`.
    fn random_value_from(
        &self,
        ty: &RawType,
        sources: &[MetadataSource],
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        let params = registry.build_parameters(self.create_parameters(), sources)?;
        self.random_value_with(ty, &params, registry)
    }
}

/// Which of the four envelope entry points a request goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Default,
    NullableDefault,
    Random,
    NullableRandom,
}

impl Request {
    /// Invoke a plain generator.
    pub fn invoke(
        self,
        generator: &dyn Generator,
        ty: &RawType,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        match self {
            Request::Default => generator.default_value(ty, registry),
            Request::NullableDefault => generator.nullable_default_value(ty, registry),
            Request::Random => generator.random_value(ty, registry),
            Request::NullableRandom => generator.nullable_random_value(ty, registry),
        }
    }

    /// Invoke a parameterizable generator with a built parameter object.
    pub fn invoke_with(
        self,
        generator: &dyn ParameterizableGenerator,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        match self {
            Request::Default => generator.default_value_with(ty, params, registry),
            Request::NullableDefault => generator.nullable_default_value_with(ty, params, registry),
            Request::Random => generator.random_value_with(ty, params, registry),
            Request::NullableRandom => generator.nullable_random_value_with(ty, params, registry),
        }
    }
}
