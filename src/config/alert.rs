//! Alerting rules.
//!
//! Unlike gauges and instrumentation rules, alerts carry their version as a persisted
//! field. Lookups compare against that field; the repository stamps it from the
//! content whenever an alert is inserted or updated.

use crate::error::ConfigError;
use crate::types::Version;
use crate::version::version_of;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    #[default]
    Transaction,
    Gauge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertConfig {
    pub kind: AlertKind,
    pub transaction_type: String,
    pub transaction_percentile: Option<f64>,
    pub transaction_threshold_millis: Option<u64>,
    pub min_transaction_count: Option<u64>,
    pub gauge_name: String,
    pub gauge_threshold: Option<f64>,
    pub time_period_seconds: u32,
    pub email_addresses: Vec<String>,
    pub version: Version,
}

impl AlertConfig {
    /// Version derived from everything except the persisted `version` field
    pub fn content_version(&self) -> Result<Version, ConfigError> {
        let unversioned = AlertConfig {
            version: Version::new(),
            ..self.clone()
        };
        version_of(&unversioned)
    }

    /// Copy with `version` set from the content
    pub fn stamped(mut self) -> Result<AlertConfig, ConfigError> {
        self.version = self.content_version()?;
        Ok(self)
    }
}
