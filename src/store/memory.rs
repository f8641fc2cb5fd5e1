//! In-memory section store with write-failure injection.

use super::{with_section, with_sections, SectionStore};
use crate::error::ConfigError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// Section store that never touches disk
#[derive(Default)]
pub struct MemorySectionStore {
    document: Mutex<Map<String, Value>>,
    fail_writes: AtomicBool,
}

impl MemorySectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_document(document: Map<String, Value>) -> Self {
        Self {
            document: Mutex::new(document),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every following write fail with a persistence error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of the whole document, in order
    pub fn document(&self) -> Map<String, Value> {
        self.document.lock().clone()
    }

    fn commit(
        &self,
        next: impl FnOnce(&Map<String, Value>) -> Map<String, Value>,
    ) -> Result<(), ConfigError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ConfigError::persistence(
                self.location(),
                std::io::Error::new(std::io::ErrorKind::Other, "write failure injected"),
            ));
        }
        let mut document = self.document.lock();
        *document = next(&document);
        Ok(())
    }
}

impl SectionStore for MemorySectionStore {
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
        "<memory>".to_string()
    }
}
