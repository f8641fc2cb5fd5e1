//! SettingsLoader: layers defaults, an optional settings file and the environment.

use super::sources::{environment, settings_file};
use super::RepositorySettings;
use crate::error::ConfigError;
use config::Config;
use std::path::Path;

/// Settings loader
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings
    ///
    /// Precedence: built-in defaults (lowest), then `settings_path` if given, then
    /// `AGENTCONF_*` environment variables (highest).
    pub fn load(settings_path: Option<&Path>) -> Result<RepositorySettings, ConfigError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&RepositorySettings::default())?);
        if let Some(path) = settings_path {
            builder = settings_file::add_to_builder(builder, path)?;
        }
        let builder = environment::add_to_builder(builder);

        let settings: RepositorySettings = builder.build()?.try_deserialize()?;
        tracing::debug!(base_dir = %settings.base_dir.display(), "Settings loaded");
        Ok(settings)
    }
}
