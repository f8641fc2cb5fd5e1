//! Configuration records owned by the repository
//!
//! Every record is an immutable value with a default for each field, so a section
//! persisted by an older agent (or edited by hand) loads with the missing fields
//! filled in. Records serialize with camelCase keys.

pub mod advanced;
pub mod alert;
pub mod gauge;
pub mod instrumentation;
pub mod plugin;
pub mod rollup;
pub mod smtp;
pub mod storage;
pub mod transaction;
pub mod ui;
pub mod user_recording;

pub use advanced::AdvancedConfig;
pub use alert::{AlertConfig, AlertKind};
pub use gauge::{default_gauge_configs, GaugeAttribute, GaugeConfig};
pub use instrumentation::{CaptureKind, InstrumentationConfig, MethodModifier};
pub use plugin::{PluginConfig, PropertyValue};
pub use rollup::{build_rollup_configs, RollupConfig};
pub use smtp::SmtpConfig;
pub use storage::StorageConfig;
pub use transaction::TransactionConfig;
pub use ui::UserInterfaceConfig;
pub use user_recording::UserRecordingConfig;

use std::sync::Arc;

/// The agent-side configuration bundle handed to the weaver and collectors in one read
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfigSnapshot {
    pub transaction_config: Arc<TransactionConfig>,
    pub user_recording_config: Arc<UserRecordingConfig>,
    pub advanced_config: Arc<AdvancedConfig>,
    pub plugin_configs: Arc<Vec<PluginConfig>>,
    pub instrumentation_configs: Arc<Vec<InstrumentationConfig>>,
    pub gauge_configs: Arc<Vec<GaugeConfig>>,
}
