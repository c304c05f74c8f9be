//! Core types for plan application.
//!
//! Defines what the engine reports back alongside the new file set.

use codeplan_types::{FileSet, OperationKind};
use serde::Serialize;

/// Result of applying an edit plan.
///
/// `files` is always a complete file set; skipped operations only show up in
/// `diagnostics`.
#[derive(Debug, Clone, Serialize)]
pub struct PatchOutcome {
    /// Resulting file set.
    pub files: FileSet,
    /// Operations that took effect, in application order.
    pub changes: Vec<AppliedChange>,
    /// Operations that were skipped or need attention, in application order.
    pub diagnostics: Vec<Diagnostic>,
}

impl PatchOutcome {
    /// Whether any operation was skipped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        self.diagnostics.iter().any(|d| d.reason.is_skip())
    }
}

/// How an operation was resolved against the file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// `before + codeToDelete + after` matched literally.
    Anchored,
    /// Anchors were stale; the unique `codeToDelete` was replaced directly.
    Direct,
    /// Binary record replaced wholesale.
    WholeValue,
    /// New file created.
    Created,
    /// Existing file overwritten by a new-file entry.
    Overwritten,
    /// File removed.
    Removed,
}

/// One operation that changed the file set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedChange {
    /// Position of the operation within its plan group.
    pub index: usize,
    /// Operation group.
    pub operation: OperationKind,
    /// Target file.
    pub file_name: String,
    /// Resolution strategy.
    pub strategy: MatchStrategy,
}

/// Why an operation was skipped or flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum DiagnosticReason {
    /// Target file absent from the working set.
    MissingFile,
    /// Anchored target absent and `codeToDelete` absent too.
    NotFound,
    /// Anchored target absent and `codeToDelete` occurs more than once.
    Ambiguous {
        /// Number of occurrences seen (capped at 2).
        occurrences: usize,
    },
    /// Anchored target absent and `codeToDelete` is empty.
    EmptyTarget,
    /// Deletion aimed at a binary record.
    BinaryDeletion,
    /// New-file entry replaced an existing record. Informational only.
    Overwrote,
}

impl DiagnosticReason {
    /// Whether the operation was dropped.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        !matches!(self, Self::Overwrote)
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::MissingFile => "file not found in working set".to_string(),
            Self::NotFound => "anchored text and target text not found".to_string(),
            Self::Ambiguous { occurrences } => {
                format!("anchor did not match and target text occurs {occurrences}+ times")
            }
            Self::EmptyTarget => "anchor did not match and target text is empty".to_string(),
            Self::BinaryDeletion => "deletion is not supported on binary files".to_string(),
            Self::Overwrote => "existing file overwritten".to_string(),
        }
    }
}

/// Per-operation note recorded while applying a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Position of the operation within its plan group.
    pub index: usize,
    /// Operation group.
    pub operation: OperationKind,
    /// Target file.
    pub file_name: String,
    /// What happened.
    #[serde(flatten)]
    pub reason: DiagnosticReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.operation.as_str(),
            self.index,
            self.file_name,
            self.reason.describe()
        )
    }
}
