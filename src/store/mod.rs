//! Persistent Section Store
//!
//! Named top-level sections of one structured document. Callers read a section as a
//! JSON value (absent sections are not an error) and write single sections or an
//! ordered batch. Section order is preserved across rewrites so the file stays
//! diff-friendly, and sections nobody asked about survive every rewrite untouched.

pub mod file;
pub mod memory;

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub use file::JsonFileStore;
pub use memory::MemorySectionStore;

/// Section store interface
pub trait SectionStore: Send + Sync {
    /// Current value of a section, if present
    fn get_section(&self, name: &str) -> Option<Value>;

    /// Write one section; an existing section keeps its position
    fn put_section(&self, name: &str, value: Value) -> Result<(), ConfigError>;

    /// Write a batch of sections in the given order, followed by all remaining sections
    fn put_all(&self, sections: Vec<(String, Value)>) -> Result<(), ConfigError>;

    /// Human-readable location for log messages
    fn location(&self) -> String;
}

/// Outcome of reading one section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionRead<T> {
    Absent,
    Decoded(T),
    /// Present but not decodable; the raw value is handed back untouched
    Unreadable(Value),
}

/// Decode a section into a typed value, keeping the raw value when decoding fails
pub fn decode_section<T: DeserializeOwned>(
    store: &dyn SectionStore,
    name: &str,
) -> SectionRead<T> {
    let value = match store.get_section(name) {
        Some(value) => value,
        None => return SectionRead::Absent,
    };
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => SectionRead::Decoded(decoded),
        Err(e) => {
            tracing::warn!(
                section = name,
                location = %store.location(),
                "Failed to decode config section, using defaults: {}",
                e
            );
            SectionRead::Unreadable(value)
        }
    }
}

/// Decode a section into a typed value
///
/// A section that exists but cannot be decoded is logged and treated as absent.
pub fn read_section<T: DeserializeOwned>(store: &dyn SectionStore, name: &str) -> Option<T> {
    match decode_section(store, name) {
        SectionRead::Decoded(decoded) => Some(decoded),
        SectionRead::Absent | SectionRead::Unreadable(_) => None,
    }
}

/// List section decoded entry by entry
#[derive(Debug, Clone, PartialEq)]
pub struct ListSection<T> {
    pub entries: Vec<T>,
    /// Entries that failed to decode, in their original order
    pub unreadable: Vec<Value>,
}

/// Decode a list section one entry at a time
///
/// One bad entry never hides the others: it is logged and returned raw in
/// `unreadable`. A present section that is not a list is `Unreadable` as a whole.
/// `null` counts as absent.
pub fn read_list_section<T: DeserializeOwned>(
    store: &dyn SectionStore,
    name: &str,
) -> SectionRead<ListSection<T>> {
    let items = match store.get_section(name) {
        None | Some(Value::Null) => return SectionRead::Absent,
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::error!(
                section = name,
                location = %store.location(),
                "Config section is not a list, using defaults"
            );
            return SectionRead::Unreadable(other);
        }
    };

    let mut section = ListSection {
        entries: Vec::with_capacity(items.len()),
        unreadable: Vec::new(),
    };
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<T>(item.clone()) {
            Ok(entry) => section.entries.push(entry),
            Err(e) => {
                tracing::error!(
                    section = name,
                    index,
                    "Failed to decode config entry: {}",
                    e
                );
                section.unreadable.push(item);
            }
        }
    }
    SectionRead::Decoded(section)
}

/// Build the next document from the current one and a single-section write.
pub(crate) fn with_section(
    document: &Map<String, Value>,
    name: &str,
    value: Value,
) -> Map<String, Value> {
    let mut next = document.clone();
    // preserve_order map: insert keeps the position of an existing key
    next.insert(name.to_string(), value);
    next
}

/// Build the next document from the current one and an ordered batch.
pub(crate) fn with_sections(
    document: &Map<String, Value>,
    sections: Vec<(String, Value)>,
) -> Map<String, Value> {
    let mut next = Map::new();
    for (name, value) in sections {
        next.insert(name, value);
    }
    for (name, value) in document {
        if !next.contains_key(name) {
            next.insert(name.clone(), value.clone());
        }
    }
    next
}
