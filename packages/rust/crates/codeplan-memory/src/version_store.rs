//! Numbered version log over a key/value store.
//!
//! Layout inside `namespace`:
//! - `<namespace>:version_counter` → highest number handed out
//! - `<namespace>:version:<n>`     → JSON array of file records
//!
//! Writes are not transactional. `save` writes the version entry before the counter,
//! so a crash between the two leaves an entry that `list_all` still reports and a
//! counter one behind; the next save then reuses that number.

use std::path::Path;
use std::sync::Arc;

use codeplan_types::{FileSet, Version};
use sha2::{Digest, Sha256};

use crate::error::VersionStoreError;
use crate::kv::{InMemoryKeyValueStore, KeyValueStore};

const COUNTER_SUFFIX: &str = "version_counter";
const VERSION_SEGMENT: &str = "version:";
const NAMESPACE_DIGEST_LEN: usize = 16;

/// Append-only log of file set snapshots.
#[derive(Clone)]
pub struct VersionStore {
    backend: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl std::fmt::Debug for VersionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStore")
            .field("backend", &self.backend.backend_name())
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl VersionStore {
    /// Create a store over `backend`, keeping keys under `namespace`.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    /// Store backed by a fresh in-memory map.
    #[must_use]
    pub fn in_memory(namespace: impl Into<String>) -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()), namespace)
    }

    /// Key namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Backend identifier.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    fn counter_key(&self) -> String {
        format!("{}:{COUNTER_SUFFIX}", self.namespace)
    }

    fn version_prefix(&self) -> String {
        format!("{}:{VERSION_SEGMENT}", self.namespace)
    }

    fn version_key(&self, version_number: u64) -> String {
        format!("{}{version_number}", self.version_prefix())
    }

    /// Highest version number handed out so far (0 for an empty store).
    ///
    /// # Errors
    /// Backend read failure or a non-numeric counter.
    pub fn current_max(&self) -> Result<u64, VersionStoreError> {
        match self.backend.get(&self.counter_key())? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| VersionStoreError::CorruptCounter(raw)),
        }
    }

    /// Persist `files` as the next version and return its number.
    ///
    /// # Errors
    /// Any failure means the version was not recorded; the caller should report it
    /// without blocking whatever triggered the save.
    pub fn save(&self, files: &FileSet) -> Result<u64, VersionStoreError> {
        let version_number = self.current_max()? + 1;
        let payload = serde_json::to_string(files)?;
        self.backend
            .set(&self.version_key(version_number), &payload)?;
        self.backend
            .set(&self.counter_key(), &version_number.to_string())?;
        tracing::info!(
            namespace = %self.namespace,
            backend = self.backend.backend_name(),
            version_number,
            files = files.len(),
            "version saved"
        );
        Ok(version_number)
    }

    /// All readable versions, ascending by number.
    ///
    /// Entries that cannot be read or decoded are logged and left out.
    ///
    /// # Errors
    /// Only when the backend cannot enumerate its keys.
    pub fn list_all(&self) -> Result<Vec<Version>, VersionStoreError> {
        let prefix = self.version_prefix();
        let mut versions = Vec::new();

        for key in self.backend.keys()? {
            let Some(suffix) = key.strip_prefix(&prefix) else {
                continue;
            };
            let Ok(version_number) = suffix.parse::<u64>() else {
                tracing::warn!(key = %key, "ignoring version key with non-numeric suffix");
                continue;
            };
            if let Some(version) = self.read_version(version_number) {
                versions.push(version);
            }
        }

        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    /// Load one version. `Ok(None)` when it does not exist or cannot be decoded.
    ///
    /// # Errors
    /// Backend read failure.
    pub fn get(&self, version_number: u64) -> Result<Option<Version>, VersionStoreError> {
        if self.backend.get(&self.version_key(version_number))?.is_none() {
            return Ok(None);
        }
        Ok(self.read_version(version_number))
    }

    fn read_version(&self, version_number: u64) -> Option<Version> {
        let key = self.version_key(version_number);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "failed to read version; skipping");
                return None;
            }
        };
        match serde_json::from_str::<FileSet>(&raw) {
            Ok(files) => Some(Version {
                version_number,
                files,
            }),
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "failed to decode version; skipping");
                None
            }
        }
    }

    /// Remove every version and the counter. Numbering restarts at 1.
    ///
    /// Unconditional: confirmation is the caller's job.
    ///
    /// # Errors
    /// Backend failure; versions removed before the failure stay removed.
    pub fn clear_all(&self) -> Result<(), VersionStoreError> {
        let prefix = self.version_prefix();
        let mut removed = 0_usize;
        for key in self.backend.keys()? {
            if key.starts_with(&prefix) {
                self.backend.remove(&key)?;
                removed += 1;
            }
        }
        self.backend.remove(&self.counter_key())?;
        tracing::info!(namespace = %self.namespace, removed, "version history cleared");
        Ok(())
    }
}

/// Build a deterministic namespace from `prefix` + project location, so two projects
/// sharing one store file never see each other's versions.
///
/// The suffix is the first 16 hex digits of the SHA-256 of the path, stable across
/// builds and toolchains.
#[must_use]
pub fn default_version_namespace(prefix: &str, project_root: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project_root.to_string_lossy().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{prefix}:{}", &digest[..NAMESPACE_DIGEST_LEN])
}
