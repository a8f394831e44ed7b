//! Integration tests for the default extraction pipeline

use rust_decimal::Decimal;
use std::sync::Arc;
use testgen::{
    Capability, CapabilitySet, Constraint, CustomSource, GenerationError, GenerationParameters,
    GeneratorRegistry, MetadataSource, ParametersSourceExtractor, SizeRange, SourceKind,
    TypeDescriptor, Value,
};

/// Reads a `max-length` custom source into the size window.
#[derive(Debug)]
struct MaxLengthExtractor;

impl ParametersSourceExtractor for MaxLengthExtractor {
    fn name(&self) -> &str {
        "max-length"
    }

    fn capability(&self) -> Option<Capability> {
        Some(Capability::Sized)
    }

    fn source_kind(&self) -> SourceKind {
        SourceKind::Custom
    }

    fn accepts(&self, source: &MetadataSource) -> bool {
        matches!(source, MetadataSource::Custom(custom) if custom.kind() == "max-length")
    }

    fn extract(
        &self,
        source: &MetadataSource,
        target: &mut GenerationParameters,
    ) -> Result<(), GenerationError> {
        let max = match source {
            MetadataSource::Custom(custom) => custom.payload::<usize>().copied(),
            _ => None,
        }
        .ok_or_else(|| GenerationError::configuration("max-length expects a usize payload"))?;
        target.tighten_size(None, Some(max));
        Ok(())
    }
}

#[test]
fn test_numeric_bounds_intersect() {
    let registry = GeneratorRegistry::new();
    let params = registry
        .build_parameters(
            GenerationParameters::number(),
            &[
                GenerationParameters::number().with_min(5).with_max(20).into(),
                GenerationParameters::number().with_min(1).with_max(10).into(),
            ],
        )
        .unwrap();
    assert_eq!(params.bounds().min, Some(Decimal::from(5)));
    assert_eq!(params.bounds().max, Some(Decimal::from(10)));
}

#[test]
fn test_constraint_and_parameter_bounds_mix() {
    let registry = GeneratorRegistry::new();
    let params = registry
        .build_parameters(
            GenerationParameters::number(),
            &[
                Constraint::Positive.into(),
                GenerationParameters::number().with_max(7).into(),
                Constraint::DecimalMax(Decimal::new(125, 1)).into(),
            ],
        )
        .unwrap();
    assert_eq!(params.bounds().min, Some(Decimal::ONE));
    assert_eq!(params.bounds().max, Some(Decimal::from(7)));
}

#[test]
fn test_non_null_is_sticky() {
    let registry = GeneratorRegistry::new();
    let params = registry
        .build_parameters(
            GenerationParameters::default(),
            &[
                GenerationParameters::default().with_nullable(true).into(),
                GenerationParameters::default().with_nullable(false).into(),
                GenerationParameters::default().with_nullable(true).into(),
            ],
        )
        .unwrap();
    assert!(!params.is_nullable());
}

#[test]
fn test_sources_outside_capabilities_are_ignored() {
    let registry = GeneratorRegistry::new();
    let params = registry
        .build_parameters(
            GenerationParameters::default(),
            &[
                Constraint::Min(3).into(),
                Constraint::size(2, 4).into(),
                TypeDescriptor::vec_of("u8".into()).into(),
            ],
        )
        .unwrap();
    assert_eq!(params, GenerationParameters::default());
}

#[test]
fn test_first_type_declaration_wins() {
    let registry = GeneratorRegistry::new();
    let params = registry
        .build_parameters(
            GenerationParameters::collection(),
            &[
                TypeDescriptor::vec_of("u8".into()).into(),
                TypeDescriptor::vec_of("String".into()).into(),
            ],
        )
        .unwrap();
    assert_eq!(params.element_type(), Some(&TypeDescriptor::from("u8")));
}

#[test]
fn test_key_value_declaration_arity() {
    let registry = GeneratorRegistry::new();
    let err = registry
        .build_parameters(
            GenerationParameters::map(),
            &[TypeDescriptor::parameterized("HashMap", vec!["i32".into()]).into()],
        )
        .unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(ref msg) if msg.contains("exactly two")));
}

#[test]
fn test_pipeline_is_filtered_by_capability() {
    let registry = GeneratorRegistry::new();
    let nullable_only = registry
        .extractors()
        .pipeline(CapabilitySet::of([Capability::Nullable]));
    assert!(nullable_only
        .extractors()
        .iter()
        .all(|e| e.capability().map_or(true, |c| c == Capability::Nullable)));

    let collection = registry
        .extractors()
        .pipeline(GenerationParameters::collection().capabilities());
    assert!(collection.extractors().len() > nullable_only.extractors().len());
}

#[test]
fn test_custom_extractor_until_reset() {
    let registry = GeneratorRegistry::new();
    let source = MetadataSource::Custom(CustomSource::new("max-length", 3usize));
    let ty = TypeDescriptor::from("String");

    // Unrecognized custom sources leave the parameters untouched.
    let before = registry
        .build_parameters(GenerationParameters::sized(), &[source.clone()])
        .unwrap();
    assert_eq!(before.size(), SizeRange::default());

    registry.register_extractor(Arc::new(MaxLengthExtractor));
    for _ in 0..50 {
        let value = registry.random_value(&ty, &[source.clone()]).unwrap();
        assert!(value.as_str().unwrap().chars().count() <= 3);
    }

    registry.reset();
    let after = registry
        .build_parameters(GenerationParameters::sized(), &[source])
        .unwrap();
    assert_eq!(after.size(), SizeRange::default());
}

#[test]
fn test_contradictory_bounds_fail_at_generation() {
    let registry = GeneratorRegistry::new();
    let sources: [MetadataSource; 2] = [Constraint::Min(10).into(), Constraint::Max(2).into()];
    let err = registry.random_value(&"i32".into(), &sources).unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(_)));

    // Merging alone never fails.
    assert!(registry
        .build_parameters(GenerationParameters::number(), &sources)
        .is_ok());
}

#[test]
fn test_not_empty_string() {
    let registry = GeneratorRegistry::new();
    let value = registry
        .nullable_default_value(&"String".into(), &[Constraint::NotEmpty.into()])
        .unwrap();
    assert_eq!(value, Value::Str("a".to_string()));
}
