//! codeplan-memory - Version history for codeplan sessions.
//!
//! Saves numbered, immutable file set snapshots when a change is approved locally,
//! lists them back for restore, and clears them on request.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    VersionStore                             │
//! │  - save / list_all / get / clear_all                        │
//! │  - counter key + one key per version                        │
//! └─────────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    KeyValueStore (get/set/remove/keys)      │
//! │  - InMemoryKeyValueStore (tests, ephemeral sessions)        │
//! │  - JsonFileKeyValueStore (atomic JSON file on disk)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust
//! use codeplan_memory::VersionStore;
//! use codeplan_types::FileSet;
//!
//! let store = VersionStore::in_memory("demo");
//! let number = store.save(&FileSet::new()).expect("in-memory save");
//! assert_eq!(number, 1);
//! ```

// ============================================================================
// Core modules
// ============================================================================

mod error;
mod file_kv;
mod kv;
mod persistence;
mod version_store;

// ============================================================================
// Public exports
// ============================================================================

pub use error::VersionStoreError;
pub use file_kv::JsonFileKeyValueStore;
pub use kv::{InMemoryKeyValueStore, KeyValueStore};
pub use version_store::{VersionStore, default_version_namespace};
