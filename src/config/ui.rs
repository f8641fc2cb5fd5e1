//! UI server and display settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserInterfaceConfig {
    pub port: u16,
    pub bind_address: String,
    pub default_displayed_transaction_type: String,
    pub default_displayed_percentiles: Vec<f64>,
    pub session_timeout_minutes: u32,
}

impl Default for UserInterfaceConfig {
    fn default() -> Self {
        Self {
            port: 4000,
            bind_address: "127.0.0.1".to_string(),
            default_displayed_transaction_type: "Web".to_string(),
            default_displayed_percentiles: vec![50.0, 95.0, 99.0],
            session_timeout_minutes: 30,
        }
    }
}
