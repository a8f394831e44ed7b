//! Integration tests for Configuration System

use std::collections::HashMap;
use tempfile::TempDir;
use testgen::logging::{init_logging, LoggingConfig};
use testgen::{ConfigLoader, GenerationError, GeneratorRegistry, SizeRange, TypeDescriptor};

#[test]
fn test_config_file_drives_generation() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("testgen.toml");

    std::fs::write(
        &config_file,
        r#"
null_probability = 1.0

[collections]
min = 4
max = 4

[strings]
min = 2
max = 3
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_with(Some(config_file.as_path()), Some(HashMap::new())).unwrap();
    assert_eq!(config.collections, SizeRange::new(4, 4));

    let registry = GeneratorRegistry::builder().config(config).build().unwrap();
    assert_eq!(registry.null_probability(), 1.0);

    let ty = TypeDescriptor::vec_of("String".into());
    for _ in 0..10 {
        assert!(registry.nullable_random_value(&ty, &[]).unwrap().is_null());

        let value = registry.random_value(&ty, &[]).unwrap();
        let elements = value.as_elements().unwrap();
        assert_eq!(elements.len(), 4);
        assert!(elements.iter().all(|e| e.is_null()));
    }

    for _ in 0..10 {
        let text = registry.random_value(&"String".into(), &[]).unwrap();
        assert!((2..=3).contains(&text.len().unwrap()));
    }
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("testgen.toml");
    std::fs::write(&config_file, "null_probability = 0.9\n").unwrap();

    let env: HashMap<String, String> = [
        ("TESTGEN_NULL_PROBABILITY", "0"),
        ("TESTGEN_MAPS__MAX", "5"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let config = ConfigLoader::load_with(Some(config_file.as_path()), Some(env)).unwrap();
    assert_eq!(config.null_probability, 0.0);
    assert_eq!(config.maps, SizeRange::new(1, 5));

    let registry = GeneratorRegistry::builder().config(config).build().unwrap();
    let ty = TypeDescriptor::map_of("u16".into(), "bool".into());
    for _ in 0..20 {
        let value = registry.nullable_random_value(&ty, &[]).unwrap();
        let entries = value.as_entries().unwrap();
        assert!((1..=5).contains(&entries.len()));
        assert!(entries.iter().all(|(_, v)| !v.is_null()));
    }
}

#[test]
fn test_invalid_file_is_configuration_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("testgen.toml");
    std::fs::write(&config_file, "[strings]\nmin = 9\nmax = 1\n").unwrap();

    let err = ConfigLoader::load_with(Some(config_file.as_path()), Some(HashMap::new())).unwrap_err();
    match err {
        GenerationError::Configuration(msg) => assert!(msg.contains("strings")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_logging_writes_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let log_file = temp_dir.path().join("logs").join("testgen.log");
    let config = LoggingConfig {
        level: "debug".to_string(),
        output: "file".to_string(),
        file: log_file.clone(),
        ..LoggingConfig::default()
    };

    init_logging(Some(&config)).unwrap();
    let registry = GeneratorRegistry::new();
    registry.random_value(&"i64".into(), &[]).unwrap();

    assert!(log_file.exists());
    // A second subscriber cannot be installed.
    assert!(init_logging(Some(&config)).is_err());
}
