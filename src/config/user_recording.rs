//! User-session recording rules.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRecordingConfig {
    /// Users whose transactions are always recorded
    pub users: Vec<String>,
    /// Overrides the transaction profiling interval for recorded users
    pub profiling_interval_millis: Option<u64>,
}

impl UserRecordingConfig {
    pub fn is_recorded(&self, user: &str) -> bool {
        self.users.iter().any(|u| u.eq_ignore_ascii_case(user))
    }
}
