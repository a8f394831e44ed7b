//! Integration tests for site-bound generation with constraint groups

use std::sync::Arc;
use testgen::{
    groups, Constraint, ExecutableId, GenerationError, GeneratorRegistry, MetadataCatalog,
    RawType, TargetSite, TargetedGenerator, TypeDescriptor, Value, DEFAULT_GROUP,
};

fn person_registry() -> GeneratorRegistry {
    let age = TargetSite::property("Person", "age");
    let nickname = TargetSite::property("Person", "nickname");
    let scores = TargetSite::property("Person", "scores");
    let ratings = TargetSite::property("Person", "ratings");
    let lookup = ExecutableId::factory("Person", "lookup");

    let mut catalog = MetadataCatalog::new();
    catalog
        .declare(age.clone(), "u8".into())
        .constrain(age.clone(), Constraint::NotNull)
        .constrain_in(age.clone(), Constraint::Min(18), ["Adult"])
        .constrain_in(age, Constraint::Max(17), ["Minor"])
        .declare(nickname.clone(), "String".into())
        .constrain_in(nickname, Constraint::NotEmpty, ["Strict"])
        .declare(scores.clone(), TypeDescriptor::vec_of("i32".into()))
        .constrain(scores.clone(), Constraint::size(2, 2))
        .constrain(scores, Constraint::Negative)
        .declare(
            ratings.clone(),
            TypeDescriptor::simple(RawType::array_of("i32".into())),
        )
        .constrain(ratings.clone(), Constraint::NotNull)
        .constrain(ratings, Constraint::size(3, 3))
        .declare(TargetSite::parameter(lookup.clone(), 0), "Uuid".into())
        .declare(TargetSite::return_value(lookup), "Person".into());

    GeneratorRegistry::builder()
        .metadata(Arc::new(catalog))
        .build()
        .unwrap()
}

#[test]
fn test_groups_select_constraints() {
    let registry = person_registry();
    let age = TargetedGenerator::for_property(&registry, "Person", "age").unwrap();

    // Default group: NotNull only.
    assert_eq!(age.nullable_default_value(&registry, &[]).unwrap(), Value::Int(0));

    let adult = groups(["Adult"]);
    for _ in 0..50 {
        let value = age.nullable_random_value(&registry, &adult).unwrap();
        if let Some(years) = value.as_int() {
            assert!((18..=255).contains(&years));
        }
    }

    let minor = groups([DEFAULT_GROUP, "Minor"]);
    for _ in 0..50 {
        let years = age.nullable_random_value(&registry, &minor).unwrap().as_int().unwrap();
        assert!(years <= 17);
    }
}

#[test]
fn test_nullable_site_yields_null_and_default() {
    let registry = person_registry();
    let nickname = TargetedGenerator::for_property(&registry, "Person", "nickname").unwrap();

    assert_eq!(nickname.nullable_default_value(&registry, &[]).unwrap(), Value::Null);
    assert_eq!(nickname.default_value(&registry, &[]).unwrap(), Value::Str(String::new()));

    let strict = groups(["Strict"]);
    assert_eq!(
        nickname.nullable_default_value(&registry, &strict).unwrap(),
        Value::Str("a".to_string())
    );

    let mut saw_null = false;
    for _ in 0..100 {
        saw_null |= nickname.nullable_random_value(&registry, &[]).unwrap().is_null();
    }
    assert!(saw_null);
}

#[test]
fn test_declared_container_site() {
    let registry = person_registry();
    let scores = registry.targeted(TargetSite::property("Person", "scores")).unwrap();
    assert_eq!(scores.declared_type(), &TypeDescriptor::vec_of("i32".into()));

    for _ in 0..20 {
        let value = scores.random_value(&registry, &[]).unwrap();
        let elements = value.as_elements().unwrap();
        assert_eq!(elements.len(), 2);
        // Bounds apply to the container's parameters, not its elements.
        assert!(elements.iter().all(|e| e.is_null() || e.as_int().is_some()));
    }
}

#[test]
fn test_plain_array_site() {
    let registry = person_registry();
    let ratings = TargetedGenerator::for_property(&registry, "Person", "ratings").unwrap();

    for _ in 0..20 {
        let value = ratings.nullable_random_value(&registry, &[]).unwrap();
        let elements = value.as_elements().unwrap();
        assert_eq!(elements.len(), 3);
        assert!(elements.iter().all(|e| e.is_null() || e.as_int().is_some()));
    }

    let default = ratings.default_value(&registry, &[]).unwrap();
    assert_eq!(default, Value::Array(vec![Value::Int(0); 3]));
}

#[test]
fn test_executable_sites() {
    let registry = person_registry();
    let lookup = ExecutableId::factory("Person", "lookup");

    let argument = TargetedGenerator::for_parameter(&registry, lookup.clone(), 0).unwrap();
    assert!(argument.default_value(&registry, &[]).unwrap() != Value::Null);

    // The return type is declared but no generator supports it.
    let err = TargetedGenerator::for_return_value(&registry, lookup).unwrap_err();
    assert!(err.is_unsupported());
}

#[test]
fn test_undeclared_site() {
    let registry = person_registry();
    let err = TargetedGenerator::for_property(&registry, "Person", "email").unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(ref msg) if msg.contains("Person.email")));
}
