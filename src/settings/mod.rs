//! Process settings
//!
//! Where the repository keeps its files and the few process-level inputs that shape
//! defaults. Loaded once at startup by [`SettingsLoader`]; the configuration repository
//! itself never reads them again.

mod loader;
pub mod sources;

pub use loader::SettingsLoader;

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one repository instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositorySettings {
    /// Directory holding the configuration document and the secret key
    pub base_dir: PathBuf,
    pub config_file: String,
    pub secret_file: String,
    /// Platform runtime without CPU load metrics
    pub legacy_runtime: bool,
    pub gauge_collection_interval_millis: u64,
    pub logging: LoggingConfig,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            config_file: "config.json".to_string(),
            secret_file: "secret".to_string(),
            legacy_runtime: false,
            gauge_collection_interval_millis: 5000,
            logging: LoggingConfig::default(),
        }
    }
}

impl RepositorySettings {
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(&self.config_file)
    }

    pub fn secret_path(&self) -> PathBuf {
        self.base_dir.join(&self.secret_file)
    }

    /// Effective settings as a TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Settings(format!("Failed to render settings: {}", e)))
    }
}

/// Platform data directory for the agent, or the working directory when there is none
pub fn default_base_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "agentconf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
