//! Key/value store persisted as one JSON object on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use anyhow::{Context, Result};

use crate::kv::KeyValueStore;
use crate::persistence::atomic_write_text;

/// File-backed key/value store.
///
/// The whole map is cached in memory and rewritten atomically on every mutation.
/// Single writer per file is assumed; there is no cross-process locking.
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileKeyValueStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// # Errors
    /// Fails when the file exists but cannot be read or is not a JSON string map.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read version store {}", path.display()))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw).with_context(|| {
                    format!("failed to decode version store {}", path.display())
                })?
            }
        } else {
            BTreeMap::new()
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "file key/value store opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let payload = serde_json::to_string_pretty(entries)
            .context("failed to encode key/value store")?;
        atomic_write_text(&self.path, &payload)
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn backend_name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.write_entries();
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(error) = self.flush(&entries) {
            // Keep the cache consistent with what is on disk.
            match previous {
                Some(previous) => entries.insert(key.to_string(), previous),
                None => entries.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.write_entries();
        let Some(previous) = entries.remove(key) else {
            return Ok(());
        };
        if let Err(error) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(error);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.keys().cloned().collect())
    }
}
