//! Primitive leaf generators: booleans, characters, integers and floats.
//!
//! Numeric generators honour bounds; their default is zero clamped into the
//! effective bounds.

use super::exact_parameterizable;
use crate::error::GenerationError;
use crate::generator::{envelope, priority, ParameterizableGenerator};
use crate::params::{GenerationParameters, NumberBounds};
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::Value;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;

/// Span used for a float side left unbounded.
pub const DEFAULT_FLOAT_SPAN: f64 = 1.0e6;

#[derive(Debug, Clone)]
pub struct BoolGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl BoolGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("bool")],
            priority: priority::NATIVE_GENERATORS,
        }
    }
}

impl Default for BoolGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for BoolGenerator {
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
        Ok(Value::Bool(false))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        Ok(Value::Bool(rand::thread_rng().gen()))
    }
}

exact_parameterizable!(BoolGenerator);

#[derive(Debug, Clone)]
pub struct CharGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl CharGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("char")],
            priority: priority::NATIVE_GENERATORS,
        }
    }
}

impl Default for CharGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for CharGenerator {
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
        Ok(Value::Char('\0'))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        _params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        Ok(Value::Char(rand::thread_rng().gen()))
    }
}

exact_parameterizable!(CharGenerator);

/// Integer generator for one native integer type.
#[derive(Debug, Clone)]
pub struct IntegerGenerator {
    types: Vec<RawType>,
    priority: i32,
    min: i128,
    max: i128,
}

impl IntegerGenerator {
    pub fn new(name: &str, min: i128, max: i128) -> Self {
        Self {
            types: vec![RawType::named(name)],
            priority: priority::NATIVE_GENERATORS,
            min,
            max,
        }
    }

    /// One generator per native integer type.
    pub fn all() -> Vec<Self> {
        vec![
            Self::new("i8", i8::MIN.into(), i8::MAX.into()),
            Self::new("i16", i16::MIN.into(), i16::MAX.into()),
            Self::new("i32", i32::MIN.into(), i32::MAX.into()),
            Self::new("i64", i64::MIN.into(), i64::MAX.into()),
            Self::new("i128", i128::MIN, i128::MAX),
            Self::new("isize", isize::MIN as i128, isize::MAX as i128),
            Self::new("u8", 0, u8::MAX.into()),
            Self::new("u16", 0, u16::MAX.into()),
            Self::new("u32", 0, u32::MAX.into()),
            Self::new("u64", 0, u64::MAX.into()),
            Self::new("usize", 0, usize::MAX as i128),
        ]
    }

    /// Bounds intersected with the type's range.
    pub fn effective_range(&self, bounds: &NumberBounds) -> Result<(i128, i128), GenerationError> {
        // Decimal magnitudes stay below 2^96, so these conversions succeed.
        let lo = bounds
            .min
            .and_then(|min| min.ceil().to_i128())
            .map_or(self.min, |min| min.max(self.min));
        let hi = bounds
            .max
            .and_then(|max| max.floor().to_i128())
            .map_or(self.max, |max| max.min(self.max));
        if lo > hi {
            return Err(GenerationError::configuration(format!(
                "Empty numeric bounds for {}: [{}, {}]",
                self.types[0], lo, hi
            )));
        }
        Ok((lo, hi))
    }
}

impl ParameterizableGenerator for IntegerGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::number()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let (lo, hi) = self.effective_range(&params.bounds())?;
        Ok(Value::Int(0i128.clamp(lo, hi)))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let (lo, hi) = self.effective_range(&params.bounds())?;
        Ok(Value::Int(rand::thread_rng().gen_range(lo..=hi)))
    }
}

exact_parameterizable!(IntegerGenerator);

/// Floating point generator for `f32` or `f64`.
#[derive(Debug, Clone)]
pub struct FloatGenerator {
    types: Vec<RawType>,
    priority: i32,
    limit: f64,
    single: bool,
}

impl FloatGenerator {
    pub fn f32() -> Self {
        Self {
            types: vec![RawType::named("f32")],
            priority: priority::NATIVE_GENERATORS,
            limit: f32::MAX.into(),
            single: true,
        }
    }

    pub fn f64() -> Self {
        Self {
            types: vec![RawType::named("f64")],
            priority: priority::NATIVE_GENERATORS,
            limit: f64::MAX,
            single: false,
        }
    }

    /// Finite sampling range. An unbounded side extends
    /// [`DEFAULT_FLOAT_SPAN`] past the other side (or past zero).
    pub fn effective_range(&self, bounds: &NumberBounds) -> Result<(f64, f64), GenerationError> {
        let min = bounds.min.and_then(|d| d.to_f64());
        let max = bounds.max.and_then(|d| d.to_f64());
        let (lo, hi) = match (min, max) {
            (Some(lo), Some(hi)) => (lo, hi),
            (Some(lo), None) => (lo, lo.max(0.0) + DEFAULT_FLOAT_SPAN),
            (None, Some(hi)) => (hi.min(0.0) - DEFAULT_FLOAT_SPAN, hi),
            (None, None) => (-DEFAULT_FLOAT_SPAN, DEFAULT_FLOAT_SPAN),
        };
        let lo = lo.max(-self.limit);
        let hi = hi.min(self.limit);
        if lo > hi {
            return Err(GenerationError::configuration(format!(
                "Empty numeric bounds for {}: [{}, {}]",
                self.types[0], lo, hi
            )));
        }
        Ok((lo, hi))
    }

    /// Narrow a sample in `[lo, hi]` to the generator's precision. An `f32`
    /// rounded out of range steps one ULP back towards it.
    fn narrow(&self, value: f64, lo: f64, hi: f64) -> Result<Value, GenerationError> {
        if !self.single {
            return Ok(Value::Float(value));
        }
        let mut narrowed = value as f32;
        if f64::from(narrowed) > hi {
            narrowed = step_down(narrowed);
        } else if f64::from(narrowed) < lo {
            narrowed = step_up(narrowed);
        }
        let widened = f64::from(narrowed);
        if widened < lo || widened > hi {
            return Err(GenerationError::configuration(format!(
                "No {} value within bounds [{}, {}]",
                self.types[0], lo, hi
            )));
        }
        Ok(Value::Float(widened))
    }
}

/// Next representable `f32` towards negative infinity.
fn step_down(value: f32) -> f32 {
    if value == 0.0 {
        -f32::from_bits(1)
    } else if value > 0.0 {
        f32::from_bits(value.to_bits() - 1)
    } else {
        f32::from_bits(value.to_bits() + 1)
    }
}

/// Next representable `f32` towards positive infinity.
fn step_up(value: f32) -> f32 {
    if value == 0.0 {
        f32::from_bits(1)
    } else if value > 0.0 {
        f32::from_bits(value.to_bits() + 1)
    } else {
        f32::from_bits(value.to_bits() - 1)
    }
}

impl ParameterizableGenerator for FloatGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::number()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let (lo, hi) = self.effective_range(&params.bounds())?;
        self.narrow(0.0f64.clamp(lo, hi), lo, hi)
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let (lo, hi) = self.effective_range(&params.bounds())?;
        let sample = if lo == hi {
            lo
        } else {
            rand::thread_rng().gen_range(lo..=hi)
        };
        self.narrow(sample.clamp(lo, hi), lo, hi)
    }
}

exact_parameterizable!(FloatGenerator);
