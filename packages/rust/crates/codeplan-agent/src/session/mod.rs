//! Edit session: generation, staging, approval, undo, and versions.

mod edit_session;
mod error;

pub use edit_session::{
    ApproveOutcome, EditSession, GenerationOutcome, SessionTarget, StagedChange, VersionRecord,
};
pub use error::SessionError;
