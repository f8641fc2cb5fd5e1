//! Core types shared across the configuration repository.

/// Version: content-derived compare token for a configuration value
pub type Version = String;

/// Section names in the persisted document.
pub mod section {
    pub const TRANSACTIONS: &str = "transactions";
    pub const USER_RECORDING: &str = "userRecording";
    pub const ADVANCED: &str = "advanced";
    pub const PLUGINS: &str = "plugins";
    pub const GAUGES: &str = "gauges";
    pub const INSTRUMENTATION: &str = "instrumentation";
    pub const UI: &str = "ui";
    pub const STORAGE: &str = "storage";
    pub const SMTP: &str = "smtp";
    pub const ALERTS: &str = "alerts";

    /// Canonical order used when the whole document is rewritten.
    pub const CANONICAL_ORDER: [&str; 10] = [
        TRANSACTIONS,
        USER_RECORDING,
        ADVANCED,
        PLUGINS,
        GAUGES,
        INSTRUMENTATION,
        UI,
        STORAGE,
        SMTP,
        ALERTS,
    ];

    /// True if the repository models this section itself.
    pub fn is_known(name: &str) -> bool {
        CANONICAL_ORDER.contains(&name)
    }
}
