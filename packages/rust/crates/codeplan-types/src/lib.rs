//! codeplan-types - Common type definitions for codeplan
//!
//! This crate provides the data model every other codeplan crate operates on:
//! file records, the file set, the model-authored edit plan, and saved versions.
//!
//! # Schema Singularity
//! `EditPlan` derives `schemars::JsonSchema` so the exact wire shape the model must
//! produce can be generated from Rust and embedded into prompts.
//!
//! # Architecture
//!
//! ```text
//! codeplan-types/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── file_set.rs  # FileRecord, FileSet
//! ├── mime.rs      # Content kinds and new-file MIME inference
//! ├── plan.rs      # EditPlan wire form + EditOperation sum type
//! └── version.rs   # Version snapshots
//! ```

#![allow(clippy::doc_markdown)]

mod file_set;
mod mime;
mod plan;
mod version;

pub use file_set::{FileRecord, FileSet};
pub use mime::{
    ContentKind, MIME_CSS, MIME_HTML, MIME_JAVASCRIPT, MIME_OCTET_STREAM, MIME_PLAIN_TEXT,
    content_kind, infer_new_file_mime_type,
};
pub use plan::{
    Deletion, EditOperation, EditPlan, Modification, NewFile, OperationKind, PlanSummary,
    edit_plan_schema,
};
pub use version::Version;
