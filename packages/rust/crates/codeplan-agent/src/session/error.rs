//! Session error type.

use codeplan_edit::PlanParseError;
use codeplan_memory::VersionStoreError;
use thiserror::Error;

use crate::github::RepositoryError;

/// Errors surfaced to the user by an edit session.
///
/// None of these leave the working file set modified.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The model request or stream failed.
    #[error("plan generation failed: {0:#}")]
    Generation(#[source] anyhow::Error),

    /// The model reply is not a valid edit plan.
    #[error(transparent)]
    InvalidPlan(#[from] PlanParseError),

    /// A staged change is waiting for approve/reject.
    #[error("a staged change is pending; approve or reject it first")]
    PendingApproval,

    /// Approve/reject without a staged change.
    #[error("nothing is staged")]
    NothingStaged,

    /// Undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Undo is not offered for remote projects.
    #[error("undo is not available for GitHub projects")]
    UndoDisabled,

    /// Restoring a local version would desync a remote project from its branch head.
    #[error("restoring versions is not available for GitHub projects")]
    RestoreDisabled,

    /// Version lookup missed.
    #[error("version {0} not found")]
    VersionNotFound(u64),

    /// Version store failure on an explicit version operation.
    #[error(transparent)]
    Versions(#[from] VersionStoreError),

    /// Remote commit failed; the staged change is kept.
    #[error(transparent)]
    Commit(#[from] RepositoryError),
}
