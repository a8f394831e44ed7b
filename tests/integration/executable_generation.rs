//! Integration tests for constructor and factory backed generation

use std::sync::Arc;
use testgen::{
    priority, Constraint, Executable, ExecutableGenerator, ExecutableId, ExecutableKind,
    GenerationError, Generator, GeneratorRegistry, MetadataCatalog, MetadataSource, RawType,
    TargetSite, TypeDescriptor, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct Order {
    quantity: Option<i128>,
    note: Option<String>,
}

fn order_constructor() -> Executable {
    Executable::constructor(
        "Order",
        [TypeDescriptor::from("u32"), TypeDescriptor::from("String")],
        |args: &[Value]| {
            Ok(Order {
                quantity: args[0].as_int(),
                note: args[1].as_str().map(str::to_owned),
            })
        },
    )
}

fn registry_with_order_metadata() -> GeneratorRegistry {
    let constructor = ExecutableId::constructor("Order");
    let mut catalog = MetadataCatalog::new();
    catalog
        .constrain(TargetSite::parameter(constructor.clone(), 0), Constraint::NotNull)
        .constrain(TargetSite::parameter(constructor.clone(), 0), Constraint::Min(1))
        .constrain(TargetSite::parameter(constructor, 0), Constraint::Max(99));
    GeneratorRegistry::builder()
        .metadata(Arc::new(catalog))
        .build()
        .unwrap()
}

#[test]
fn test_argument_nullability_follows_site_metadata() {
    let registry = registry_with_order_metadata();
    registry.register_executable(order_constructor()).unwrap();

    let mut saw_null_note = false;
    for _ in 0..200 {
        let value = registry.random_value(&"Order".into(), &[]).unwrap();
        let order = value.downcast_ref::<Order>().unwrap();
        let quantity = order.quantity.expect("quantity is NotNull");
        assert!((1..=99).contains(&quantity));
        saw_null_note |= order.note.is_none();
    }
    assert!(saw_null_note);
}

#[test]
fn test_default_invokes_with_argument_defaults() {
    let registry = registry_with_order_metadata();
    registry.register_executable(order_constructor()).unwrap();

    let value = registry.default_value(&"Order".into(), &[]).unwrap();
    assert_eq!(
        value.downcast_ref::<Order>(),
        Some(&Order {
            quantity: Some(1),
            note: None,
        })
    );
}

#[test]
fn test_factory_registered_as_generator() {
    let registry = GeneratorRegistry::new();
    let factory = Executable::factory(
        "Order",
        "bulk",
        [TypeDescriptor::vec_of("u8".into())],
        |args: &[Value]| {
            let quantity = args[0].len().map(|n| n as i128);
            Ok(Order {
                quantity,
                note: Some("bulk".to_string()),
            })
        },
    );
    assert_eq!(factory.kind(), ExecutableKind::Factory);

    let generator = ExecutableGenerator::new(&registry, factory)
        .unwrap()
        .with_priority(priority::MAX);
    assert_eq!(generator.name(), "bulk");
    registry.register(Arc::new(generator));
    registry.register_executable(order_constructor()).unwrap();

    let value = registry.random_value(&"Order".into(), &[]).unwrap();
    assert_eq!(value.downcast_ref::<Order>().unwrap().note.as_deref(), Some("bulk"));
}

#[test]
fn test_failures_carry_cause() {
    let registry = GeneratorRegistry::new();
    let failing = Executable::constructor("Order", [TypeDescriptor::from("bool")], |_: &[Value]| {
        Err::<Order, _>(anyhow::anyhow!("inventory closed"))
    });
    registry.register_executable(failing).unwrap();

    let err = registry.random_value(&"Order".into(), &[]).unwrap_err();
    match err {
        GenerationError::GenerationFailure { message, source } => {
            assert!(message.contains("Order"));
            assert_eq!(source.unwrap().to_string(), "inventory closed");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unsupported_argument_rejected_at_registration() {
    let registry = GeneratorRegistry::new();
    let needs_widget = Executable::constructor("Order", [TypeDescriptor::from("Widget")], |_: &[Value]| {
        Ok(Order {
            quantity: None,
            note: None,
        })
    });
    let err = registry.register_executable(needs_widget).unwrap_err();
    assert!(err.is_unsupported());
    assert!(!registry.supports(&"Order".into()));
}

#[test]
fn test_executable_results_compose_into_containers() {
    let registry = registry_with_order_metadata();
    registry.register_executable(order_constructor()).unwrap();

    let ty = TypeDescriptor::vec_of("Order".into());
    let sources: [MetadataSource; 2] = [Constraint::NotNull.into(), Constraint::size(3, 3).into()];
    let value = registry.random_value(&ty, &sources).unwrap();
    let orders = value.as_elements().unwrap();
    assert_eq!(orders.len(), 3);
    assert!(orders.iter().all(|o| o.downcast_ref::<Order>().is_some()));
}

#[test]
fn test_plain_array_argument() {
    let registry = GeneratorRegistry::new();
    let holder = Executable::constructor(
        "Holder",
        [TypeDescriptor::simple(RawType::array_of("u8".into()))],
        |args: &[Value]| Ok(args[0].clone()),
    );
    registry.register_executable(holder).unwrap();

    for _ in 0..20 {
        let value = registry.random_value(&"Holder".into(), &[]).unwrap();
        let bytes = value.downcast_ref::<Value>().unwrap();
        assert!(bytes.is_null() || bytes.as_elements().is_some());
    }
}
