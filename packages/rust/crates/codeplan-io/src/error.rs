//! Error types for file set I/O.

use thiserror::Error;

/// Error types for loading and writing file sets.
#[derive(Error, Debug)]
pub enum IoError {
    /// Path does not exist or is not a directory.
    #[error("Directory not found: {0}")]
    NotFound(String),

    /// Record content claims to be a data URI but is not one.
    #[error("Invalid data URI for {0}")]
    InvalidDataUri(String),

    /// File name would escape the project directory.
    #[error("Refusing to write outside the project directory: {0}")]
    UnsafePath(String),

    /// Directory traversal failure.
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
