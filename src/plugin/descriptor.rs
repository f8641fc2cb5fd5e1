//! Plugin descriptors and property schemas.

use crate::config::PropertyValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type of a plugin property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Boolean,
    String,
    Number,
    /// Number in `0..=100`
    Percentage,
}

impl PropertyType {
    /// Whether null is an acceptable value
    pub fn is_nullable(self) -> bool {
        matches!(self, PropertyType::String | PropertyType::Number)
    }

    /// Value used when neither the persisted config nor the descriptor supplies one
    pub fn default_value(self) -> PropertyValue {
        match self {
            PropertyType::Boolean => PropertyValue::Boolean(false),
            PropertyType::String => PropertyValue::String(String::new()),
            PropertyType::Number => PropertyValue::Null,
            PropertyType::Percentage => PropertyValue::Number(0.0),
        }
    }

    /// Convert a non-null persisted value, if it has this type
    pub fn accept(self, value: &Value) -> Option<PropertyValue> {
        match (self, value) {
            (PropertyType::Boolean, Value::Bool(b)) => Some(PropertyValue::Boolean(*b)),
            (PropertyType::String, Value::String(s)) => Some(PropertyValue::String(s.clone())),
            (PropertyType::Number, Value::Number(n)) => n.as_f64().map(PropertyValue::Number),
            (PropertyType::Percentage, Value::Number(n)) => n
                .as_f64()
                .filter(|p| (0.0..=100.0).contains(p))
                .map(PropertyValue::Number),
            _ => None,
        }
    }

    /// Whether an already-typed value is valid for this type
    pub fn is_valid(self, value: &PropertyValue) -> bool {
        match value {
            PropertyValue::Null => self.is_nullable(),
            PropertyValue::Boolean(b) => self.accept(&Value::Bool(*b)).is_some(),
            PropertyValue::String(s) => self.accept(&Value::String(s.clone())).is_some(),
            PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(|n| self.accept(&Value::Number(n)).is_some())
                .unwrap_or(false),
        }
    }
}

/// One declared plugin property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, rename = "default")]
    pub default_value: Option<PropertyValue>,
    #[serde(default)]
    pub label: String,
}

impl PropertyDescriptor {
    /// Declared default, or the type default if the declared one is missing or invalid
    pub fn validated_default(&self) -> PropertyValue {
        match &self.default_value {
            Some(value) if self.property_type.is_valid(value) => value.clone(),
            Some(_) => {
                tracing::warn!(
                    property = %self.name,
                    "Invalid default value declared for plugin property"
                );
                self.property_type.default_value()
            }
            None => self.property_type.default_value(),
        }
    }
}

/// Installed plugin as reported by plugin discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}
