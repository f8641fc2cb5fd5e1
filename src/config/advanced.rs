//! Advanced and internal tuning knobs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdvancedConfig {
    pub weaving_timer: bool,
    /// Transactions still running after this long are stored as partial traces
    pub immediate_partial_store_threshold_seconds: u32,
    pub max_aggregate_transactions_per_type: u32,
    pub max_aggregate_queries_per_type: u32,
    pub max_trace_entries_per_transaction: u32,
    pub max_stack_trace_samples_per_transaction: u32,
    pub capture_thread_info: bool,
    pub capture_gc_activity: bool,
    pub mbean_gauge_not_found_delay_seconds: u32,
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            weaving_timer: false,
            immediate_partial_store_threshold_seconds: 60,
            max_aggregate_transactions_per_type: 500,
            max_aggregate_queries_per_type: 500,
            max_trace_entries_per_transaction: 2000,
            max_stack_trace_samples_per_transaction: 10000,
            capture_thread_info: true,
            capture_gc_activity: true,
            mbean_gauge_not_found_delay_seconds: 60,
        }
    }
}
