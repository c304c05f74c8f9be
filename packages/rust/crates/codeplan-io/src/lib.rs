//! codeplan-io - File set I/O against a local project directory.
//!
//! # Architecture
//!
//! ```text
//! codeplan-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── detect.rs   # Binary detection & MIME lookup
//! ├── data_uri.rs # base64 data URIs for binary records
//! ├── dirs.rs     # Project directory resolution
//! └── loader.rs   # Directory -> FileSet and back
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use codeplan_io::{LoadOptions, load_file_set, sync_file_set};
//!
//! let before = load_file_set("site", &LoadOptions::default())?;
//! // ... apply a plan to get `after` ...
//! sync_file_set("site", &before, &after)?;
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod data_uri;
mod detect;
mod dirs;
mod error;
mod loader;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use data_uri::{decode_data_uri, encode_data_uri, split_data_uri};
pub use detect::{detect_mime_type, is_binary};
pub use dirs::ProjectDirs;
pub use error::IoError;
pub use loader::{LoadOptions, SyncReport, load_file_set, record_from_bytes, sync_file_set};
