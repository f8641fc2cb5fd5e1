//! Plugin Schema Reconciler
//!
//! Plugins declare their configurable properties in descriptors discovered at agent
//! startup. Persisted overrides are merged against those declarations so the plugin
//! configuration always matches the schema of the plugins actually installed.

mod descriptor;
mod reconcile;

pub use descriptor::{PluginDescriptor, PropertyDescriptor, PropertyType};
pub use reconcile::{reconcile, reconcile_one, sorted_descriptors, PersistedPluginConfig};
