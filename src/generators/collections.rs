//! Container generators: sequences, sets and maps.
//!
//! Components are generated through the registry with
//! [`composition`](crate::composition). Sequence elements and map values
//! share the container's nullability; set elements and map keys are never
//! null.

use super::exact_parameterizable;
use crate::composition;
use crate::error::GenerationError;
use crate::generator::{envelope, priority, ParameterizableGenerator};
use crate::params::GenerationParameters;
use crate::registry::GeneratorRegistry;
use crate::types::RawType;
use crate::value::Value;

/// `Vec` and `VecDeque`.
#[derive(Debug, Clone)]
pub struct SequenceGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("Vec"), RawType::named("VecDeque")],
            priority: priority::GENERIC_GENERATORS,
        }
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for SequenceGenerator {
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
        let element = params.element_type();
        let size = composition::default_size(params, registry.config().collections)?;
        let elements = composition::fill(size, || composition::default_component(registry, element))?;
        Ok(Value::Seq(elements))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let element = params.element_type();
        let size = composition::random_size(params, registry.config().collections)?;
        let elements = composition::fill(size, || {
            composition::component(registry, element, params.is_nullable())
        })?;
        Ok(Value::Seq(elements))
    }
}

exact_parameterizable!(SequenceGenerator);

/// `HashSet` and `BTreeSet`.
///
/// Default sets are empty unless a minimum size is requested; elements
/// beyond the first are then random, since default elements are all equal.
#[derive(Debug, Clone)]
pub struct SetGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl SetGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("HashSet"), RawType::named("BTreeSet")],
            priority: priority::GENERIC_GENERATORS,
        }
    }
}

impl Default for SetGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for SetGenerator {
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
        let element = params.element_type();
        let size = composition::default_size(params, registry.config().collections)?;
        if size == 0 {
            return Ok(Value::Set(Vec::new()));
        }
        let mut first = Some(composition::default_component(registry, element)?);
        let elements = composition::fill_unique(size, || match first.take() {
            Some(value) => Ok(value),
            None => composition::random_component(registry, element),
        })?;
        Ok(Value::Set(elements))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let element = params.element_type();
        let size = composition::random_size(params, registry.config().collections)?;
        let elements =
            composition::fill_unique(size, || composition::random_component(registry, element))?;
        Ok(Value::Set(elements))
    }
}

exact_parameterizable!(SetGenerator);

/// `HashMap` and `BTreeMap`.
#[derive(Debug, Clone)]
pub struct MapGenerator {
    types: Vec<RawType>,
    priority: i32,
}

impl MapGenerator {
    pub fn new() -> Self {
        Self {
            types: vec![RawType::named("HashMap"), RawType::named("BTreeMap")],
            priority: priority::GENERIC_GENERATORS,
        }
    }

    fn entries(
        keys: Vec<Value>,
        mut value: impl FnMut() -> Result<Value, GenerationError>,
    ) -> Result<Value, GenerationError> {
        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            entries.push((key, value()?));
        }
        Ok(Value::Map(entries))
    }
}

impl Default for MapGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterizableGenerator for MapGenerator {
    fn create_parameters(&self) -> GenerationParameters {
        GenerationParameters::map()
    }

    fn default_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let (key, value) = (params.key_type(), params.value_type());
        let size = composition::default_size(params, registry.config().maps)?;
        if size == 0 {
            return Ok(Value::Map(Vec::new()));
        }
        let mut first = Some(composition::default_component(registry, key)?);
        let keys = composition::fill_unique(size, || match first.take() {
            Some(k) => Ok(k),
            None => composition::random_component(registry, key),
        })?;
        Self::entries(keys, || composition::default_component(registry, value))
    }

    fn random_value_with(
        &self,
        ty: &RawType,
        params: &GenerationParameters,
        registry: &GeneratorRegistry,
    ) -> Result<Value, GenerationError> {
        envelope::ensure_supported(self, ty, registry)?;
        let (key, value) = (params.key_type(), params.value_type());
        let size = composition::random_size(params, registry.config().maps)?;
        let keys = composition::fill_unique(size, || composition::random_component(registry, key))?;
        Self::entries(keys, || {
            composition::component(registry, value, params.is_nullable())
        })
    }
}

exact_parameterizable!(MapGenerator);
