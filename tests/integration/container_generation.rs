//! Integration tests for recursive container composition

use std::collections::HashSet;
use testgen::{
    Constraint, GenerationError, GenerationParameters, GeneratorRegistry, GeneratorsConfig,
    MetadataSource, SizeRange, TypeDescriptor, Value,
};

fn exactly_three() -> [MetadataSource; 1] {
    [Constraint::size(3, 3).into()]
}

#[test]
fn test_fixed_size_containers() {
    let registry = GeneratorRegistry::new();
    let containers = [
        TypeDescriptor::vec_of("i32".into()),
        TypeDescriptor::parameterized("VecDeque", ["char".into()]),
        TypeDescriptor::set_of("u64".into()),
        TypeDescriptor::parameterized("BTreeSet", ["String".into()]),
        TypeDescriptor::map_of("i32".into(), "String".into()),
        TypeDescriptor::parameterized("BTreeMap", ["Uuid".into(), "bool".into()]),
        TypeDescriptor::generic_array("f64".into()),
    ];
    for ty in &containers {
        for _ in 0..20 {
            let value = registry.nullable_random_value(ty, &exactly_three()).unwrap();
            if let Some(len) = value.len() {
                assert_eq!(len, 3, "{ty} produced {value:?}");
            } else {
                assert!(value.is_null());
            }
        }
    }
}

#[test]
fn test_map_end_to_end() {
    let registry = GeneratorRegistry::new();
    let ty = TypeDescriptor::map_of("i32".into(), "String".into());

    let mut sizes = HashSet::new();
    let mut saw_null_value = false;
    for _ in 0..100 {
        let value = registry.random_value(&ty, &[]).unwrap();
        let entries = value.as_entries().unwrap();
        sizes.insert(entries.len());
        for (key, value) in entries {
            assert!(key.as_int().is_some(), "key was {key:?}");
            saw_null_value |= value.is_null();
        }
        let distinct: HashSet<i128> = entries.iter().filter_map(|(k, _)| k.as_int()).collect();
        assert_eq!(distinct.len(), entries.len());
    }
    assert!(sizes.len() >= 2);
    assert!(saw_null_value);
}

#[test]
fn test_non_null_container_has_non_null_elements() {
    let registry = GeneratorRegistry::new();
    let ty = TypeDescriptor::vec_of("i16".into());
    let sources: [MetadataSource; 2] = [Constraint::NotNull.into(), Constraint::size(5, 8).into()];
    for _ in 0..50 {
        let value = registry.nullable_random_value(&ty, &sources).unwrap();
        let elements = value.as_elements().unwrap();
        assert!((5..=8).contains(&elements.len()));
        assert!(elements.iter().all(|e| !e.is_null()));
    }
}

#[test]
fn test_nested_type_arguments_propagate() {
    let registry = GeneratorRegistry::new();
    let ty = TypeDescriptor::map_of("String".into(), TypeDescriptor::vec_of("u8".into()));
    let params = GenerationParameters::map().with_size(2, 2).with_nullable(false);
    for _ in 0..20 {
        let value = registry.random_value_with_params(&ty, &params).unwrap();
        let entries = value.as_entries().unwrap();
        assert_eq!(entries.len(), 2);
        for (key, inner) in entries {
            assert!(key.as_str().is_some());
            let bytes = inner.as_elements().unwrap();
            assert!(bytes
                .iter()
                .all(|b| b.is_null() || (0..=255).contains(&b.as_int().unwrap())));
        }
    }
}

#[test]
fn test_default_containers_hold_minimum() {
    let registry = GeneratorRegistry::new();
    assert_eq!(
        registry.default_value(&TypeDescriptor::vec_of("bool".into()), &[]).unwrap(),
        Value::Seq(Vec::new())
    );

    let not_empty: [MetadataSource; 1] = [Constraint::NotEmpty.into()];
    assert_eq!(
        registry
            .nullable_default_value(&TypeDescriptor::vec_of("bool".into()), &not_empty)
            .unwrap(),
        Value::Seq(vec![Value::Bool(false)])
    );

    let value = registry
        .default_value(&TypeDescriptor::set_of("u8".into()), &exactly_three())
        .unwrap();
    let elements = value.as_elements().unwrap();
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[0], Value::Int(0));
}

#[test]
fn test_configured_windows_apply() {
    let config = GeneratorsConfig {
        collections: SizeRange::new(2, 2),
        ..GeneratorsConfig::default()
    };
    let registry = GeneratorRegistry::builder().config(config).build().unwrap();
    let ty = TypeDescriptor::vec_of("u8".into());
    for _ in 0..20 {
        assert_eq!(registry.random_value(&ty, &[]).unwrap().len(), Some(2));
    }

    // An explicit request outside the window is honoured.
    let sources: [MetadataSource; 1] = [Constraint::size(4, 6).into()];
    let len = registry.random_value(&ty, &sources).unwrap().len().unwrap();
    assert!((4..=6).contains(&len));
}

#[test]
fn test_set_of_too_few_values_fails() {
    let registry = GeneratorRegistry::new();
    let ty = TypeDescriptor::set_of("bool".into());
    let err = registry.random_value(&ty, &exactly_three()).unwrap_err();
    assert!(matches!(err, GenerationError::GenerationFailure { .. }));
}

#[test]
fn test_raw_container_without_arguments() {
    let registry = GeneratorRegistry::new();
    let err = registry.random_value(&"Vec".into(), &exactly_three()).unwrap_err();
    assert!(matches!(err, GenerationError::NullArgument(_)));

    // Nothing to generate when the size is zero.
    let empty: [MetadataSource; 1] = [Constraint::size(0, 0).into()];
    assert_eq!(
        registry.random_value(&"Vec".into(), &empty).unwrap(),
        Value::Seq(Vec::new())
    );
}
