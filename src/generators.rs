//! Built-in Generators
//!
//! Leaf generators for the native value types and the structural generators
//! for containers, arrays and enumerations. [`baseline`] is the set a fresh
//! registry starts from and `reset()` restores.

use crate::generator::Generator;
use std::sync::Arc;

pub mod array;
pub mod collections;
pub mod enums;
pub mod identity;
pub mod primitives;
pub mod text;

pub use array::ArrayGenerator;
pub use collections::{MapGenerator, SequenceGenerator, SetGenerator};
pub use enums::EnumGenerator;
pub use identity::{DateTimeGenerator, UuidGenerator};
pub use primitives::{BoolGenerator, CharGenerator, FloatGenerator, IntegerGenerator};
pub use text::StringGenerator;

/// Implements [`Generator`] for a struct with `types` and `priority` fields
/// by delegating to its [`ParameterizableGenerator`] impl with an empty
/// parameter object.
///
/// [`ParameterizableGenerator`]: crate::generator::ParameterizableGenerator
macro_rules! exact_parameterizable {
    ($generator:ty) => {
        impl $crate::generator::Generator for $generator {
            fn name(&self) -> &str {
                stringify!($generator)
            }

            fn priority(&self) -> i32 {
                self.priority
            }

            fn exact_types(&self) -> Vec<$crate::types::RawType> {
                self.types.clone()
            }

            fn supports(
                &self,
                ty: &$crate::types::RawType,
                _registry: &$crate::registry::GeneratorRegistry,
            ) -> bool {
                self.types.contains(ty)
            }

            fn default_value(
                &self,
                ty: &$crate::types::RawType,
                registry: &$crate::registry::GeneratorRegistry,
            ) -> Result<$crate::value::Value, $crate::error::GenerationError> {
                use $crate::generator::ParameterizableGenerator;
                self.default_value_with(ty, &self.create_parameters(), registry)
            }

            fn random_value(
                &self,
                ty: &$crate::types::RawType,
                registry: &$crate::registry::GeneratorRegistry,
            ) -> Result<$crate::value::Value, $crate::error::GenerationError> {
                use $crate::generator::ParameterizableGenerator;
                self.random_value_with(ty, &self.create_parameters(), registry)
            }

            fn nullable_default_value(
                &self,
                ty: &$crate::types::RawType,
                registry: &$crate::registry::GeneratorRegistry,
            ) -> Result<$crate::value::Value, $crate::error::GenerationError> {
                use $crate::generator::ParameterizableGenerator;
                self.nullable_default_value_with(ty, &self.create_parameters(), registry)
            }

            fn nullable_random_value(
                &self,
                ty: &$crate::types::RawType,
                registry: &$crate::registry::GeneratorRegistry,
            ) -> Result<$crate::value::Value, $crate::error::GenerationError> {
                use $crate::generator::ParameterizableGenerator;
                self.nullable_random_value_with(ty, &self.create_parameters(), registry)
            }

            fn as_parameterizable(
                &self,
            ) -> Option<&dyn $crate::generator::ParameterizableGenerator> {
                Some(self)
            }
        }
    };
}

pub(crate) use exact_parameterizable;

/// Built-in generators in registration order.
pub fn baseline() -> Vec<Arc<dyn Generator>> {
    let mut generators: Vec<Arc<dyn Generator>> = vec![
        Arc::new(BoolGenerator::new()),
        Arc::new(CharGenerator::new()),
    ];
    generators.extend(
        IntegerGenerator::all()
            .into_iter()
            .map(|g| Arc::new(g) as Arc<dyn Generator>),
    );
    generators.extend([
        Arc::new(FloatGenerator::f32()) as Arc<dyn Generator>,
        Arc::new(FloatGenerator::f64()),
        Arc::new(StringGenerator::new()),
        Arc::new(UuidGenerator::new()),
        Arc::new(DateTimeGenerator::new()),
        Arc::new(SequenceGenerator::new()),
        Arc::new(SetGenerator::new()),
        Arc::new(MapGenerator::new()),
        Arc::new(ArrayGenerator::new()),
    ]);
    generators
}
