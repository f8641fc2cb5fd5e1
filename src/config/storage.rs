//! Storage retention policy.

use super::rollup::build_rollup_configs;
use serde::{Deserialize, Serialize};

/// Retention and size caps, with one list entry per rollup level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StorageConfig {
    pub rollup_expiration_hours: Vec<u32>,
    pub trace_expiration_hours: u32,
    pub rollup_capped_database_sizes_mb: Vec<u32>,
    pub trace_capped_database_size_mb: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let levels = build_rollup_configs().len();
        let mut rollup_expiration_hours = vec![24 * 3, 24 * 14, 24 * 90, 24 * 365 * 2];
        rollup_expiration_hours.resize(levels, 24 * 365 * 2);
        Self {
            rollup_expiration_hours,
            trace_expiration_hours: 24 * 14,
            rollup_capped_database_sizes_mb: vec![500; levels],
            trace_capped_database_size_mb: 500,
        }
    }
}

impl StorageConfig {
    /// True if any per-level list does not have one entry per rollup level
    pub fn has_list_issues(&self) -> bool {
        let defaults = StorageConfig::default();
        self.rollup_expiration_hours.len() != defaults.rollup_expiration_hours.len()
            || self.rollup_capped_database_sizes_mb.len()
                != defaults.rollup_capped_database_sizes_mb.len()
    }

    /// Copy with every per-level list padded or truncated to the rollup level count
    pub fn with_corrected_lists(&self) -> StorageConfig {
        let defaults = StorageConfig::default();
        StorageConfig {
            rollup_expiration_hours: fix_list(
                &self.rollup_expiration_hours,
                &defaults.rollup_expiration_hours,
            ),
            rollup_capped_database_sizes_mb: fix_list(
                &self.rollup_capped_database_sizes_mb,
                &defaults.rollup_capped_database_sizes_mb,
            ),
            ..self.clone()
        }
    }
}

/// Right-pad `list` with the matching tail of `defaults`, or truncate it, so the
/// result has exactly `defaults.len()` entries.
pub fn fix_list<T: Clone>(list: &[T], defaults: &[T]) -> Vec<T> {
    if list.len() >= defaults.len() {
        return list[..defaults.len()].to_vec();
    }
    let mut corrected = list.to_vec();
    corrected.extend_from_slice(&defaults[list.len()..]);
    corrected
}
