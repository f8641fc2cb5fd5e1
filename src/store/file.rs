//! File-backed section store: one pretty-printed JSON document per file.

use super::{with_section, with_sections, SectionStore};
use crate::error::ConfigError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// JSON document store with atomic whole-file rewrites
pub struct JsonFileStore {
    path: PathBuf,
    /// Last document successfully written to (or read from) disk
    document: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store, reading the existing document if there is one
    ///
    /// A missing file is an empty document. A file that is not a JSON object is moved
    /// aside to `<name>.invalid` and replaced by an empty document on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::read(path.into(), true)
    }

    /// Open the store without touching the file system
    ///
    /// A file that is not a JSON object reads as an empty document and stays in place.
    pub fn open_read_only(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::read(path.into(), false)
    }

    fn read(path: PathBuf, move_aside: bool) -> Result<Self, ConfigError> {
        let document = if path.exists() {
            let content =
                fs::read_to_string(&path).map_err(|e| ConfigError::persistence(&path, e))?;
            match parse_document(&content) {
                Some(document) => document,
                None if !move_aside => {
                    tracing::error!("Config file {} is not a JSON object", path.display());
                    Map::new()
                }
                None => {
                    let invalid = sibling(&path, "invalid");
                    tracing::error!(
                        "Config file {} is not a JSON object, moving it to {}",
                        path.display(),
                        invalid.display()
                    );
                    fs::rename(&path, &invalid).map_err(|e| ConfigError::persistence(&path, e))?;
                    Map::new()
                }
            }
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the document to a temporary sibling, then rename it over the target.
    fn write_document(&self, document: &Map<String, Value>) -> Result<(), ConfigError> {
        let mut content = serde_json::to_string_pretty(document)?;
        content.push('\n');

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::persistence(parent, e))?;
            }
        }

        let tmp_path = sibling(&self.path, "tmp");
        let mut file =
            fs::File::create(&tmp_path).map_err(|e| ConfigError::persistence(&tmp_path, e))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| ConfigError::persistence(&tmp_path, e))?;
        drop(file);

        fs::rename(&tmp_path, &self.path).map_err(|e| ConfigError::persistence(&self.path, e))
    }

    fn commit(
        &self,
        next: impl FnOnce(&Map<String, Value>) -> Map<String, Value>,
    ) -> Result<(), ConfigError> {
        let mut document = self.document.lock();
        let updated = next(&document);
        self.write_document(&updated)?;
        *document = updated;
        Ok(())
    }
}

impl SectionStore for JsonFileStore {
    fn get_section(&self, name: &str) -> Option<Value> {
        self.document.lock().get(name).cloned()
    }

    fn put_section(&self, name: &str, value: Value) -> Result<(), ConfigError> {
        self.commit(|document| with_section(document, name, value))
    }

    fn put_all(&self, sections: Vec<(String, Value)>) -> Result<(), ConfigError> {
        self.commit(|document| with_sections(document, sections))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn parse_document(content: &str) -> Option<Map<String, Value>> {
    if content.trim().is_empty() {
        return Some(Map::new());
    }
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".");
    name.push(extension);
    path.with_file_name(name)
}
