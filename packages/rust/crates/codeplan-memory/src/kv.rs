//! Key/value capability the version store is built on.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use anyhow::Result;

/// Minimal string key/value storage. No transactions.
pub trait KeyValueStore: Send + Sync {
    /// Backend identifier for logs.
    fn backend_name(&self) -> &'static str;

    /// Read a value.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Missing keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Process-local store backed by a `BTreeMap`.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.keys().cloned().collect())
    }
}
