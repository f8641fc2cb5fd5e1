//! agentconf: Versioned Configuration Repository for Monitoring Agents
//!
//! Holds every mutable agent setting in one JSON document. Readers get immutable
//! snapshots without locking; writers pass the version they last read and lose
//! cleanly to a concurrent change. Plugin settings are reconciled against the
//! installed plugins on every start, and listeners hear about each committed change.

pub mod concurrency;
pub mod config;
pub mod error;
pub mod listener;
pub mod logging;
pub mod plugin;
pub mod repository;
pub mod secret;
pub mod settings;
pub mod store;
pub mod tooling;
pub mod types;
pub mod version;

pub use error::ConfigError;
pub use listener::ConfigListener;
pub use repository::{ConfigRepository, RepositoryOptions};
pub use types::Version;
pub use version::version_of;
