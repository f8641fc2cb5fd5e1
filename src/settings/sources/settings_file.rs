//! Settings file source: one TOML document, required when named.

use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Add a settings file to builder. A named file that does not exist is an error.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::Settings(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }
    let name = path.to_str().ok_or_else(|| {
        ConfigError::Settings(format!("Settings path is not valid UTF-8: {}", path.display()))
    })?;
    Ok(builder.add_source(File::new(name, FileFormat::Toml).required(true)))
}
