//! Integration tests for generator resolution and registry lifecycle

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use testgen::{
    priority, GenerationError, Generator, GeneratorRegistry, RawType, TypeDescriptor, Value,
};

/// Generator recording every value request it receives.
#[derive(Debug)]
struct Counting {
    label: &'static str,
    accepts: Vec<RawType>,
    priority: i32,
    structural: bool,
    calls: AtomicUsize,
}

impl Counting {
    fn exact(label: &'static str, ty: &str, priority: i32) -> Self {
        Self {
            label,
            accepts: vec![RawType::named(ty)],
            priority,
            structural: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn structural(label: &'static str, ty: &str, priority: i32) -> Self {
        Self {
            structural: true,
            ..Self::exact(label, ty, priority)
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Generator for Counting {
    fn name(&self) -> &str {
        self.label
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn exact_types(&self) -> Vec<RawType> {
        if self.structural {
            Vec::new()
        } else {
            self.accepts.clone()
        }
    }

    fn supports(&self, ty: &RawType, _registry: &GeneratorRegistry) -> bool {
        self.accepts.contains(ty)
    }

    fn default_value(&self, _ty: &RawType, _registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Str(self.label.to_string()))
    }

    fn random_value(&self, _ty: &RawType, _registry: &GeneratorRegistry) -> Result<Value, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Str(self.label.to_string()))
    }
}

#[test]
fn test_highest_priority_wins_across_exact_and_structural() {
    let registry = GeneratorRegistry::new();
    registry.register(Arc::new(Counting::exact("exact", "Money", priority::DEFAULT)));
    registry.register(Arc::new(Counting::structural("structural", "Money", priority::DEFAULT + 1)));

    let resolved = registry.get_generator(&"Money".into()).unwrap();
    assert_eq!(resolved.name(), "structural");
}

#[test]
fn test_ties_resolve_to_first_registered() {
    let registry = GeneratorRegistry::new();
    registry.register(Arc::new(Counting::structural("first", "Money", priority::DEFAULT)));
    registry.register(Arc::new(Counting::exact("second", "Money", priority::DEFAULT)));

    let value = registry.random_value(&"Money".into(), &[]).unwrap();
    assert_eq!(value, Value::Str("first".to_string()));
}

#[test]
fn test_user_generator_overrides_builtin() {
    let registry = GeneratorRegistry::new();
    assert_eq!(
        registry.default_value(&"String".into(), &[]).unwrap(),
        Value::Str(String::new())
    );

    registry.register(Arc::new(Counting::exact("custom", "String", priority::DEFAULT)));
    assert_eq!(
        registry.default_value(&"String".into(), &[]).unwrap(),
        Value::Str("custom".to_string())
    );

    // Containers resolve their components through the same registry.
    let names = TypeDescriptor::vec_of("String".into());
    let params = testgen::GenerationParameters::collection()
        .with_size(2, 2)
        .with_nullable(false);
    let value = registry.random_value_with_params(&names, &params).unwrap();
    assert_eq!(
        value,
        Value::Seq(vec![Value::Str("custom".to_string()), Value::Str("custom".to_string())])
    );
}

#[test]
fn test_reset_is_idempotent_and_restores_baseline() {
    let registry = GeneratorRegistry::new();
    let probes: Vec<RawType> = ["bool", "i64", "String", "Vec", "Money", "Uuid"]
        .into_iter()
        .map(RawType::named)
        .chain([RawType::array_of("Money".into()), RawType::array_of("u8".into())])
        .collect();
    let baseline: Vec<bool> = probes.iter().map(|t| registry.supports(t)).collect();

    registry.register(Arc::new(Counting::exact("money", "Money", priority::DEFAULT)));
    assert!(registry.supports(&RawType::array_of("Money".into())));

    registry.reset();
    let once: Vec<bool> = probes.iter().map(|t| registry.supports(t)).collect();
    registry.reset();
    let twice: Vec<bool> = probes.iter().map(|t| registry.supports(t)).collect();

    assert_eq!(once, baseline);
    assert_eq!(twice, baseline);
}

#[test]
fn test_unregistered_type_never_calls_a_generator() {
    let registry = GeneratorRegistry::new();
    let exact = Arc::new(Counting::exact("exact", "Money", priority::MAX));
    let structural = Arc::new(Counting::structural("structural", "Money", priority::MAX));
    registry.register(exact.clone());
    registry.register(structural.clone());

    let unknown = TypeDescriptor::from("Invoice");
    for result in [
        registry.default_value(&unknown, &[]),
        registry.nullable_default_value(&unknown, &[]),
        registry.random_value(&unknown, &[]),
        registry.nullable_random_value(&unknown, &[]),
    ] {
        let err = result.unwrap_err();
        assert!(err.is_unsupported(), "unexpected error: {err}");
    }
    assert_eq!(exact.calls(), 0);
    assert_eq!(structural.calls(), 0);
}

#[test]
fn test_unsupported_component_surfaces_from_containers() {
    let registry = GeneratorRegistry::new();
    let ty = TypeDescriptor::vec_of("Invoice".into());
    let params = testgen::GenerationParameters::collection().with_size(1, 1);
    let err = registry.random_value_with_params(&ty, &params).unwrap_err();
    assert!(matches!(err, GenerationError::GenerationFailure { .. }));
    assert!(err.to_string().contains("Invoice"));
}

#[test]
fn test_default_never_null_for_builtins() {
    let registry = GeneratorRegistry::new();
    for name in ["bool", "char", "i8", "u64", "f32", "f64", "String", "Uuid", "DateTime"] {
        let value = registry.default_value(&name.into(), &[]).unwrap();
        assert!(!value.is_null(), "{name} default was null");
    }
}
