//! Environment source: `TESTGEN_*` variables, `__` between nested keys.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use std::collections::HashMap;

/// Prefix of every configuration variable.
pub const ENV_PREFIX: &str = "TESTGEN";

/// Add the environment source. `environment` replaces the process
/// environment when given.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    environment: Option<HashMap<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(environment),
    )
}
