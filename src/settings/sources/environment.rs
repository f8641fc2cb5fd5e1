//! Environment variable source: AGENTCONF_ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add environment variable overlay to builder.
///
/// `AGENTCONF_BASE_DIR` sets `base_dir`; nested keys use `__`, as in
/// `AGENTCONF_LOGGING__LEVEL`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("AGENTCONF")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
