//! Error types for reading model output into an edit plan.
//!
//! Applying a plan never fails; only turning text into a plan can.

use thiserror::Error;

/// Failure to turn accumulated model text into an `EditPlan`.
#[derive(Error, Debug)]
pub enum PlanParseError {
    /// Nothing left after trimming and fence stripping.
    #[error("Model returned an empty response")]
    Empty,

    /// Text is not a JSON object of the edit plan shape.
    #[error("Invalid edit plan JSON: {0}")]
    Json(#[from] serde_json::Error),
}
