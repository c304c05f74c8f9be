//! Saved project snapshots.

use serde::{Deserialize, Serialize};

use crate::file_set::FileSet;

/// Immutable numbered snapshot recorded on approval in local mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Monotonic number, starting at 1.
    pub version_number: u64,
    /// Files as they were when the version was saved.
    pub files: FileSet,
}
