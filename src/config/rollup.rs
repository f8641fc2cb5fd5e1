//! Rollup levels used by downstream aggregation.
//!
//! Fixed in code, never persisted. The number of levels also fixes the length of the
//! per-level lists in [`StorageConfig`](super::StorageConfig).

use serde::Serialize;

const MINUTE_MILLIS: u64 = 60 * 1000;
const HOUR_MILLIS: u64 = 60 * MINUTE_MILLIS;
const DAY_MILLIS: u64 = 24 * HOUR_MILLIS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupConfig {
    /// Width of one aggregation bucket
    pub interval_millis: u64,
    /// Longest chart range served from this level
    pub view_duration_millis: u64,
}

/// Rollup levels, finest first
pub fn build_rollup_configs() -> Vec<RollupConfig> {
    vec![
        RollupConfig {
            interval_millis: MINUTE_MILLIS,
            view_duration_millis: 4 * HOUR_MILLIS,
        },
        RollupConfig {
            interval_millis: 5 * MINUTE_MILLIS,
            view_duration_millis: DAY_MILLIS,
        },
        RollupConfig {
            interval_millis: 30 * MINUTE_MILLIS,
            view_duration_millis: 7 * DAY_MILLIS,
        },
        RollupConfig {
            interval_millis: 4 * HOUR_MILLIS,
            view_duration_millis: 30 * DAY_MILLIS,
        },
    ]
}
