//! Built-in source extractors
//!
//! One extractor per constraint family and per parameter capability. Each
//! merges into the target; none of them replaces an earlier, tighter value.

use super::ParametersSourceExtractor;
use crate::error::GenerationError;
use crate::metadata::{Constraint, MetadataSource, SourceKind};
use crate::params::{Capability, GenerationParameters};
use crate::types::TypeDescriptor;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Baseline extractor set, in registration order.
pub fn baseline() -> Vec<Arc<dyn ParametersSourceExtractor>> {
    vec![
        Arc::new(NotNullExtractor),
        Arc::new(NullableParamsExtractor),
        Arc::new(BoundConstraintExtractor),
        Arc::new(NumberParamsExtractor),
        Arc::new(SizeConstraintExtractor),
        Arc::new(SizeParamsExtractor),
        Arc::new(SingleGenericTypeExtractor),
        Arc::new(SingleGenericParamsExtractor),
        Arc::new(KeyValueTypeExtractor),
        Arc::new(KeyValueParamsExtractor),
    ]
}

fn unsupported_source(extractor: &str, source: &MetadataSource) -> GenerationError {
    GenerationError::configuration(format!(
        "Extractor '{}' cannot read {:?} source",
        extractor,
        source.kind()
    ))
}

/// `NotNull` and `NotEmpty` make the target non-nullable.
#[derive(Debug, Default)]
pub struct NotNullExtractor;

impl ParametersSourceExtractor for NotNullExtractor {
    fn name(&self) -> &str {
        "not-null"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Nullable)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Constraint
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(
            source,
            MetadataSource::Constraint(Constraint::NotNull | Constraint::NotEmpty)
        )
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Constraint(Constraint::NotNull | Constraint::NotEmpty) => {
                target.restrict_nullable(false);
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// Copies nullability from another parameter object.
#[derive(Debug, Default)]
pub struct NullableParamsExtractor;

impl ParametersSourceExtractor for NullableParamsExtractor {
    fn name(&self) -> &str {
        "nullable-params"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Nullable)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Parameters
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(source, MetadataSource::Parameters(p) if p.supports(Capability::Nullable))
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Parameters(params) => {
                target.restrict_nullable(params.is_nullable());
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// Numeric constraints: min/max, decimal min/max and the sign constraints.
#[derive(Debug, Default)]
pub struct BoundConstraintExtractor;

impl ParametersSourceExtractor for BoundConstraintExtractor {
    fn name(&self) -> &str {
        "numeric-bounds"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Bounded)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Constraint
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(
            source,
            MetadataSource::Constraint(
                Constraint::Min(_)
                    | Constraint::Max(_)
                    | Constraint::DecimalMin(_)
                    | Constraint::DecimalMax(_)
                    | Constraint::Positive
                    | Constraint::PositiveOrZero
                    | Constraint::Negative
                    | Constraint::NegativeOrZero
            )
        )
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        let constraint = match source {
            MetadataSource::Constraint(constraint) => constraint,
            other => return Err(unsupported_source(self.name(), other)),
        };
        match constraint {
            Constraint::Min(min) => target.tighten_min(Decimal::from(*min)),
            Constraint::Max(max) => target.tighten_max(Decimal::from(*max)),
            Constraint::DecimalMin(min) => target.tighten_min(*min),
            Constraint::DecimalMax(max) => target.tighten_max(*max),
            Constraint::Positive => target.tighten_min(Decimal::ONE),
            Constraint::PositiveOrZero => target.tighten_min(Decimal::ZERO),
            Constraint::Negative => target.tighten_max(Decimal::NEGATIVE_ONE),
            Constraint::NegativeOrZero => target.tighten_max(Decimal::ZERO),
            _ => return Err(unsupported_source(self.name(), source)),
        }
        Ok(())
    }
}

/// Intersects bounds with another parameter object's.
#[derive(Debug, Default)]
pub struct NumberParamsExtractor;

impl ParametersSourceExtractor for NumberParamsExtractor {
    fn name(&self) -> &str {
        "number-params"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Bounded)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Parameters
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(source, MetadataSource::Parameters(p) if p.supports(Capability::Bounded))
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Parameters(params) => {
                target.intersect_bounds(&params.bounds());
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// `Size` and `NotEmpty` constraints.
#[derive(Debug, Default)]
pub struct SizeConstraintExtractor;

impl ParametersSourceExtractor for SizeConstraintExtractor {
    fn name(&self) -> &str {
        "size"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Sized)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Constraint
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(
            source,
            MetadataSource::Constraint(Constraint::Size { .. } | Constraint::NotEmpty)
        )
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Constraint(Constraint::Size { min, max }) => {
                target.tighten_size(Some(*min), Some(*max));
                Ok(())
            }
            MetadataSource::Constraint(Constraint::NotEmpty) => {
                target.tighten_size(Some(1), None);
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// Intersects size windows with another parameter object's.
#[derive(Debug, Default)]
pub struct SizeParamsExtractor;

impl ParametersSourceExtractor for SizeParamsExtractor {
    fn name(&self) -> &str {
        "size-params"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Sized)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Parameters
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(source, MetadataSource::Parameters(p) if p.supports(Capability::Sized))
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Parameters(params) => {
                let size = params.size();
                target.tighten_size(Some(size.min), Some(size.max));
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// Element type of a single-argument type declaration or generic array.
#[derive(Debug, Default)]
pub struct SingleGenericTypeExtractor;

impl SingleGenericTypeExtractor {
    fn element_of(declaration: &TypeDescriptor) -> Option<&TypeDescriptor> {
        match declaration {
            TypeDescriptor::GenericArray(component) => Some(component),
            TypeDescriptor::Parameterized(_, arguments) if arguments.len() == 1 => {
                arguments.first()
            }
            _ => None,
        }
    }
}

impl ParametersSourceExtractor for SingleGenericTypeExtractor {
    fn name(&self) -> &str {
        "single-generic-type"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::SingleGeneric)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::TypeDeclaration
    }

    /// Simple declarations carry no arguments and are left alone.
    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(
            source,
            MetadataSource::TypeDeclaration(
                TypeDescriptor::GenericArray(_) | TypeDescriptor::Parameterized(..)
            )
        )
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        let declaration = match source {
            MetadataSource::TypeDeclaration(declaration) => declaration,
            other => return Err(unsupported_source(self.name(), other)),
        };
        match Self::element_of(declaration) {
            Some(element) => {
                target.offer_element_type(element);
                Ok(())
            }
            None => Err(GenerationError::configuration(format!(
                "Expected exactly one type argument in '{}'",
                declaration
            ))),
        }
    }
}

/// Element type from another parameter object.
#[derive(Debug, Default)]
pub struct SingleGenericParamsExtractor;

impl ParametersSourceExtractor for SingleGenericParamsExtractor {
    fn name(&self) -> &str {
        "single-generic-params"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::SingleGeneric)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Parameters
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(source, MetadataSource::Parameters(p) if p.supports(Capability::SingleGeneric))
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Parameters(params) => {
                if let Some(element) = params.element_type() {
                    target.offer_element_type(element);
                }
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// Key and value types of a two-argument type declaration.
#[derive(Debug, Default)]
pub struct KeyValueTypeExtractor;

impl ParametersSourceExtractor for KeyValueTypeExtractor {
    fn name(&self) -> &str {
        "key-value-type"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::PairGeneric)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::TypeDeclaration
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(
            source,
            MetadataSource::TypeDeclaration(TypeDescriptor::Parameterized(..))
        )
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        let declaration = match source {
            MetadataSource::TypeDeclaration(declaration) => declaration,
            other => return Err(unsupported_source(self.name(), other)),
        };
        match declaration.type_arguments() {
            [key, value] => {
                target.offer_key_value_types(key, value);
                Ok(())
            }
            arguments => Err(GenerationError::configuration(format!(
                "Expected exactly two type arguments in '{}', found {}",
                declaration,
                arguments.len()
            ))),
        }
    }
}

/// Key and value types from another parameter object.
#[derive(Debug, Default)]
pub struct KeyValueParamsExtractor;

impl ParametersSourceExtractor for KeyValueParamsExtractor {
    fn name(&self) -> &str {
        "key-value-params"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::PairGeneric)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Parameters
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(source, MetadataSource::Parameters(p) if p.supports(Capability::PairGeneric))
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        match source {
            MetadataSource::Parameters(params) => {
                if let (Some(key), Some(value)) = (params.key_type(), params.value_type()) {
                    target.offer_key_value_types(key, value);
                }
                Ok(())
            }
            other => Err(unsupported_source(self.name(), other)),
        }
    }
}

/// Placeholder accepting every source and changing nothing.
///
/// Not part of the baseline.
#[derive(Debug, Default)]
pub struct NopExtractor;

impl ParametersSourceExtractor for NopExtractor {
    fn name(&self) -> &str {
        "nop"
    }

    fn priority(&self) -> i32 {
        i32::MIN
    }

    fn capability(&self) -> Option<Capability> {
        None
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Custom
    }

    fn accepts(&self, _source: &MetadataSource) -> bool {
        true
    }

    fn extract(
        &self,
        _source: &MetadataSource,
        _target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        Ok(())
    }
}
