//! Nullability & randomization envelope
//!
//! The default/random × nullable/non-null decision applied identically on
//! top of every generator.

use super::Generator;
use crate::error::GenerationError;
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::Value;
use rand::Rng;

/// Fail with `UnsupportedValueType` unless `generator` supports `ty`.
pub fn ensure_supported<G: Generator + ?Sized>(
    generator: &G,
    ty: &RawType,
    registry: &GeneratorRegistry,
) -> Result<(), GenerationError> {
    if generator.supports(ty, registry) {
        Ok(())
    } else {
        Err(GenerationError::UnsupportedValueType(ty.clone()))
    }
}

/// Null when `nullable`, otherwise the canonical default.
pub fn nullable_default<F>(nullable: bool, default: F) -> Result<Value, GenerationError>
where
    F: FnOnce() -> Result<Value, GenerationError>,
{
    if nullable {
        Ok(Value::Null)
    } else {
        default()
    }
}

/// Null on a Bernoulli draw when `nullable`, otherwise a random value.
pub fn nullable_random<F>(
    nullable: bool,
    null_probability: f64,
    random: F,
) -> Result<Value, GenerationError>
where
    F: FnOnce() -> Result<Value, GenerationError>,
{
    if nullable && draw_null(null_probability) {
        Ok(Value::Null)
    } else {
        random()
    }
}

/// One Bernoulli draw; probabilities outside `[0, 1]` are clamped.
pub fn draw_null(null_probability: f64) -> bool {
    if null_probability.is_nan() {
        return false;
    }
    rand::thread_rng().gen_bool(null_probability.clamp(0.0, 1.0))
}
