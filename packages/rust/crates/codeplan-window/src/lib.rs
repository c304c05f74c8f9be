//! codeplan-window: bounded undo history for an editing session.
//!
//! Ring buffer of pre-change file set snapshots, most recent first. Lives for the
//! process only and is never persisted; saved versions are `codeplan-memory`'s job.

mod history;

pub use history::{DEFAULT_HISTORY_DEPTH, SessionHistory};
