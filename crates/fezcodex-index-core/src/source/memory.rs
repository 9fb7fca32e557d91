//! In-memory [`ContentSource`] for tests and embedding.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;

use super::ContentSource;

enum Entry {
    Document(Value),
    Failure(String),
}

/// Serves JSON documents from a path-keyed map.
///
/// Unknown paths fail with a "not found" error. Paths registered with
/// [`fail`](MemorySource::fail) fail with the given message, which is how
/// tests simulate a 404 or a malformed payload.
pub struct MemorySource {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Builder-style [`insert`](MemorySource::insert).
    pub fn with(self, path: &str, document: Value) -> Self {
        self.insert(path, document);
        self
    }

    pub fn insert(&self, path: &str, document: Value) {
        self.write().insert(path.to_string(), Entry::Document(document));
    }

    /// Make every fetch of `path` fail with `message`.
    pub fn fail(&self, path: &str, message: &str) {
        self.write()
            .insert(path.to_string(), Entry::Failure(message.to_string()));
    }

    pub fn remove(&self, path: &str) {
        self.write().remove(path);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn fetch_json(&self, path: &str) -> Result<Value> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match entries.get(path) {
            Some(Entry::Document(value)) => Ok(value.clone()),
            Some(Entry::Failure(message)) => Err(anyhow!("{}: {}", path, message)),
            None => Err(anyhow!("{}: not found", path)),
        }
    }
}
