//! Error types for the configuration repository.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by repository reads, writes and startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The caller's prior version no longer matches the current content.
    #[error("configuration was modified concurrently, re-read and retry")]
    OptimisticLock,

    /// A gauge with the same object name already exists.
    #[error("duplicate gauge object name: {0}")]
    DuplicateName(String),

    /// Reading or writing a backing file failed.
    #[error("persistence failure at {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A persisted entry is malformed.
    #[error("invalid configuration: {0}")]
    Validation(String),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("plugin not found: {0}")]
    PluginNotFound(String),

    #[error("invalid secret key file {}: {reason}", path.display())]
    InvalidSecretKey { path: PathBuf, reason: String },

    /// Process settings or logging could not be initialized.
    #[error("settings error: {0}")]
    Settings(String),
}

impl ConfigError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Persistence {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Settings(err.to_string())
    }
}
