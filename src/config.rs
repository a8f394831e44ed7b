//! Configuration System
//!
//! Layered configuration for the generation engine: merge-policy defaults,
//! then an optional TOML file, then `TESTGEN_*` environment variables
//! (`__` separates nested keys, e.g. `TESTGEN_COLLECTIONS__MAX=3`).

use crate::error::GenerationError;
use crate::generator::DEFAULT_NULL_PROBABILITY;
use crate::logging::LoggingConfig;
use crate::params::SizeRange;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

mod merge_policy;
mod sources;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorsConfig {
    /// Probability that a nullable random request yields null
    #[serde(default = "default_null_probability")]
    pub null_probability: f64,

    /// Size window for sequences, sets and arrays
    #[serde(default = "default_collections")]
    pub collections: SizeRange,

    /// Size window for maps
    #[serde(default = "default_maps")]
    pub maps: SizeRange,

    /// Length window for strings
    #[serde(default = "default_strings")]
    pub strings: SizeRange,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_null_probability() -> f64 {
    DEFAULT_NULL_PROBABILITY
}

fn default_collections() -> SizeRange {
    SizeRange::new(1, 10)
}

fn default_maps() -> SizeRange {
    SizeRange::new(1, 100)
}

fn default_strings() -> SizeRange {
    SizeRange::new(1, 40)
}

impl Default for GeneratorsConfig {
    fn default() -> Self {
        Self {
            null_probability: default_null_probability(),
            collections: default_collections(),
            maps: default_maps(),
            strings: default_strings(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NullProbability(f64),
    SizeWindow(&'static str, SizeRange),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NullProbability(p) => {
                write!(f, "null_probability must be within [0, 1], got {}", p)
            }
            ValidationError::SizeWindow(name, window) => {
                write!(
                    f,
                    "{}: min {} is greater than max {}",
                    name, window.min, window.max
                )
            }
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl GeneratorsConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.null_probability) {
            errors.push(ValidationError::NullProbability(self.null_probability));
        }

        for (name, window) in [
            ("collections", self.collections),
            ("maps", self.maps),
            ("strings", self.strings),
        ] {
            if window.min > window.max {
                errors.push(ValidationError::SizeWindow(name, window));
            }
        }

        if let Err(e) = crate::logging::validate(&self.logging) {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validation as a single configuration error.
    pub fn validated(self) -> Result<Self, GenerationError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            GenerationError::configuration(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}

/// Builds a [`GeneratorsConfig`] from defaults, file and environment.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults overridden by the process environment.
    pub fn load() -> Result<GeneratorsConfig, GenerationError> {
        Self::load_with(None, None)
    }

    /// Defaults, then `path` (if it exists), then the process environment.
    pub fn load_from_file(path: &Path) -> Result<GeneratorsConfig, GenerationError> {
        Self::load_with(Some(path), None)
    }

    /// Like [`ConfigLoader::load_from_file`] with an explicit environment in
    /// place of the process environment.
    pub fn load_with(
        path: Option<&Path>,
        environment: Option<HashMap<String, String>>,
    ) -> Result<GeneratorsConfig, GenerationError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        if let Some(path) = path {
            builder = sources::file::add_to_builder(builder, path)?;
        }
        builder = sources::env::add_to_builder(builder, environment);

        let config: GeneratorsConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }
}
