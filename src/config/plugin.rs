//! Materialized per-plugin property values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Typed plugin property value
///
/// Persisted as a plain JSON scalar; the declared property type decides how a
/// number is interpreted (plain number or percentage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    String(String),
    Number(f64),
    Null,
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Reconciled configuration of one plugin
///
/// `properties` always holds exactly the properties the plugin currently declares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginConfig {
    pub id: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl PluginConfig {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    pub fn boolean_property(&self, name: &str) -> bool {
        self.property(name)
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }
}
