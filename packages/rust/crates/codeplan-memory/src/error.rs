//! Error types for the version store.

use thiserror::Error;

/// Failures surfaced by [`crate::VersionStore`].
///
/// Callers treat any of these as "history not recorded" and carry on.
#[derive(Error, Debug)]
pub enum VersionStoreError {
    /// The backing key/value store rejected a read or write.
    #[error("version storage unavailable: {0:#}")]
    Backend(#[from] anyhow::Error),

    /// A file set could not be serialized.
    #[error("failed to encode version payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The stored counter is not a number.
    #[error("version counter is corrupt: {0:?}")]
    CorruptCounter(String),
}
