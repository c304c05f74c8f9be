#![allow(clippy::doc_markdown)]

//! codeplan-edit - Anchored patch engine for codeplan
//!
//! Applies a model-authored `EditPlan` to a `FileSet` deterministically.
//!
//! # Features
//!
//! - **Anchored Replace**: `before + codeToDelete + after` located literally, first hit wins
//! - **Fallback**: unanchored replacement when the target text is unique
//! - **Total**: unresolvable operations become diagnostics, never errors
//! - **Diff Preview**: unified line diffs of the resulting file set
//!
//! # Architecture
//!
//! ```text
//! codeplan-edit/src/
//! ├── lib.rs        # Re-exports (this file)
//! ├── error.rs      # PlanParseError enum (thiserror)
//! ├── types.rs      # PatchOutcome, Diagnostic, AppliedChange
//! ├── locate.rs     # locate_and_replace matcher
//! ├── engine.rs     # PatchEngine implementation
//! ├── plan_text.rs  # Fence stripping + JSON parsing of model output
//! ├── diff.rs       # Diff generation utilities
//! └── preview.rs    # File-level change listing
//! ```
//!
//! # Example
//!
//! ```rust
//! use codeplan_edit::{PatchEngine, parse_edit_plan};
//! use codeplan_types::{FileRecord, FileSet};
//!
//! let files = FileSet::from_records([FileRecord::new("a.js", "let a = 1;", "application/javascript")]);
//! let plan = parse_edit_plan(r#"{"modify":[{"fileName":"a.js","before":"let ","codeToDelete":"a","newCode":"b","after":" = 1"}]}"#)
//!     .expect("valid plan");
//! let outcome = PatchEngine::apply_plan(&files, &plan);
//! assert_eq!(outcome.files.get("a.js").map(|r| r.content.as_str()), Some("let b = 1;"));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod diff;
mod engine;
mod error;
mod locate;
mod plan_text;
mod preview;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use engine::{PatchEngine, apply_plan};
pub use error::PlanParseError;
pub use locate::{Replacement, locate_and_replace};
pub use plan_text::{parse_edit_plan, strip_code_fence};
pub use preview::{ChangeStatus, FileChange, preview_changes};
pub use types::{AppliedChange, Diagnostic, DiagnosticReason, MatchStrategy, PatchOutcome};

// Re-export diff utility for external use
pub use diff::generate_unified_diff;
