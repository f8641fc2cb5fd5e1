//! Integration tests for the agent configuration repository

mod concurrent_updates;
mod list_entities;
mod listeners;
mod plugin_reconciliation;
mod support;
mod update_paths;
