//! Error types for the value synthesis engine.

use crate::types::RawType;
use thiserror::Error;

/// Boxed cause carried by [`GenerationError::GenerationFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Generation errors
///
/// None of these are retried anywhere in the crate: each one points at a
/// caller or configuration fix.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No registered generator supports the requested type.
    #[error("Unsupported value type: {0}")]
    UnsupportedValueType(RawType),

    /// Malformed metadata source, arity mismatch, invalid settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The underlying construction or invocation failed.
    #[error("Generation failed: {message}")]
    GenerationFailure {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A required argument was missing.
    #[error("Required argument is missing: {0}")]
    NullArgument(&'static str),
}

impl GenerationError {
    pub fn failure(message: impl Into<String>) -> Self {
        GenerationError::GenerationFailure {
            message: message.into(),
            source: None,
        }
    }

    pub fn failure_caused_by(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        GenerationError::GenerationFailure {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        GenerationError::Configuration(message.into())
    }

    /// True when the error is an [`GenerationError::UnsupportedValueType`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, GenerationError::UnsupportedValueType(_))
    }
}

impl From<config::ConfigError> for GenerationError {
    fn from(err: config::ConfigError) -> Self {
        GenerationError::Configuration(err.to_string())
    }
}
