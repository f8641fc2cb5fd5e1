//! Transaction tracing settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionConfig {
    /// Transactions slower than this are captured as traces
    pub slow_threshold_millis: u64,
    /// Stack sampling interval while profiling a transaction
    pub profiling_interval_millis: u64,
    pub capture_thread_stats: bool,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            slow_threshold_millis: 2000,
            profiling_interval_millis: 1000,
            capture_thread_stats: true,
        }
    }
}
