//! Merge persisted plugin overrides against live plugin descriptors.

use super::descriptor::{PluginDescriptor, PropertyDescriptor};
use crate::config::{PluginConfig, PropertyValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Plugin section entry as found on disk, before schema validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedPluginConfig {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Descriptors in canonical persisted order: id ascending, ignoring case
pub fn sorted_descriptors(descriptors: &[PluginDescriptor]) -> Vec<PluginDescriptor> {
    let mut sorted = descriptors.to_vec();
    sorted.sort_by(|a, b| {
        a.id.to_lowercase()
            .cmp(&b.id.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

/// Build the plugin configuration list for the installed plugins
///
/// Output has one entry per descriptor, in canonical order, each holding exactly the
/// declared properties. Persisted properties no longer declared are dropped.
pub fn reconcile(
    persisted: Option<&[PersistedPluginConfig]>,
    descriptors: &[PluginDescriptor],
) -> Vec<PluginConfig> {
    let by_id: HashMap<&str, &PersistedPluginConfig> = persisted
        .unwrap_or_default()
        .iter()
        .map(|config| (config.id.as_str(), config))
        .collect();

    sorted_descriptors(descriptors)
        .iter()
        .map(|descriptor| {
            let overrides = by_id.get(descriptor.id.as_str()).map(|c| &c.properties);
            reconcile_one(descriptor, overrides)
        })
        .collect()
}

/// Build one plugin's configuration from its descriptor and optional overrides
pub fn reconcile_one(
    descriptor: &PluginDescriptor,
    overrides: Option<&Map<String, Value>>,
) -> PluginConfig {
    let properties: BTreeMap<String, PropertyValue> = descriptor
        .properties
        .iter()
        .map(|property| {
            let value = resolve_property(&descriptor.id, property, overrides);
            (property.name.clone(), value)
        })
        .collect();

    PluginConfig {
        id: descriptor.id.clone(),
        properties,
    }
}

fn resolve_property(
    plugin_id: &str,
    property: &PropertyDescriptor,
    overrides: Option<&Map<String, Value>>,
) -> PropertyValue {
    let persisted = match overrides.and_then(|o| o.get(&property.name)) {
        Some(value) => value,
        None => return property.validated_default(),
    };
    if persisted.is_null() {
        return property.validated_default();
    }
    match property.property_type.accept(persisted) {
        Some(value) => value,
        None => {
            tracing::warn!(
                plugin = plugin_id,
                property = %property.name,
                "Invalid value for plugin property, using default"
            );
            property.validated_default()
        }
    }
}
