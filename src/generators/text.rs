//! String generator.

use super::exact_parameterizable;
use crate::error::GenerationError;
use crate::generator::{envelope, priority, ParameterizableGenerator};
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::Value;
use rand::Rng;

/// Character repeated in default strings that must be non-empty.
pub const DEFAULT_FILL: char = 'a';

/// `String` and `str` values of random Unicode scalars.
///
/// The default is the shortest string allowed by the size bounds, usually
/// empty.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl StringGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("String"), RawType::named("str")],
            priority: priority::NATIVE_GENERATORS,
        }
    }
}

impl Default for StringGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for StringGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::sized()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        params.size().effective(registry.config().strings)?;
        let length = params.size().min;
        Ok(Value::Str(std::iter::repeat(DEFAULT_FILL).take(length).collect()))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let range = params.size().effective(registry.config().strings)?;
        let mut rng = rand::thread_rng();
        let length = rng.gen_range(range);
        let text: String = (0..length).map(|_| rng.gen::<char>()).collect();
        Ok(Value::Str(text))
    }
}

exact_parameterizable!(StringGenerator);
