//! UUID and timestamp generators.

use super::exact_parameterizable;
use crate::error::GenerationError;
use crate::generator::{envelope, priority, ParameterizableGenerator};
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::Value;
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use uuid::Uuid;

/// Upper bound (exclusive) of random timestamps: 2100-01-01T00:00:00Z.
pub const MAX_RANDOM_TIMESTAMP: i64 = 4_102_444_800;

/// Random v4 UUIDs; the default is the nil UUID.
#[derive(Debug, Clone)]
pub struct UuidGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl UuidGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("Uuid")],
            priority: priority::NATIVE_GENERATORS,
        }
    }
}

impl Default for UuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for UuidGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::default()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        Ok(Value::Uuid(Uuid::nil()))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        Ok(Value::Uuid(Uuid::new_v4()))
    }
}

exact_parameterizable!(UuidGenerator);

/// UTC timestamps with second precision; the default is the Unix epoch.
#[derive(Debug, Clone)]
pub struct DateTimeGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl DateTimeGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("DateTime")],
            priority: priority::NATIVE_GENERATORS,
        }
    }

    fn at(seconds: i64) -> Result<DateTime<Utc>, GenerationError> {
        Utc.timestamp_opt(seconds, 0)
            .single()
            .ok_or_else(|| GenerationError::failure(format!("Invalid timestamp: {}", seconds)))
    }
}

impl Default for DateTimeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for DateTimeGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::default()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        Ok(Value::Timestamp(Self::at(0)?))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let seconds = rand::thread_rng().gen_range(0..MAX_RANDOM_TIMESTAMP);
        Ok(Value::Timestamp(Self::at(seconds)?))
    }
}

exact_parameterizable!(DateTimeGenerator);
