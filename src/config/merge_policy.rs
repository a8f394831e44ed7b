//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources override earlier ones key by key: defaults, then the TOML
//! file, then the environment.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("null_probability", crate::generator::DEFAULT_NULL_PROBABILITY)?
        .set_default("collections.min", 1_i64)?
        .set_default("collections.max", 10_i64)?
        .set_default("maps.min", 1_i64)?
        .set_default("maps.max", 100_i64)?
        .set_default("strings.min", 1_i64)?
        .set_default("strings.max", 40_i64)
}
