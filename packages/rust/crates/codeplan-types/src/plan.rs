//! Edit plan wire format and the typed operation view the engine dispatches on.
//!
//! The model emits the camelCase JSON object described by [`EditPlan`]. Every group
//! is optional, and anchor strings default to empty when the model omits them or
//! sends `null`.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Remove `code_to_delete` from `file_name`, anchored by `before` / `after`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    /// Target file.
    pub file_name: String,
    /// Literal text immediately preceding the deleted code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub before: String,
    /// Literal text to remove.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code_to_delete: String,
    /// Literal text immediately following the deleted code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub after: String,
}

/// Replace `code_to_delete` with `new_code` in `file_name`, anchored by `before` / `after`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Modification {
    /// Target file.
    pub file_name: String,
    /// Literal text immediately preceding the replaced code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub before: String,
    /// Literal text to replace. Empty for binary records.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code_to_delete: String,
    /// Replacement text. For binary records this is the whole new data URI.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub new_code: String,
    /// Literal text immediately following the replaced code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub after: String,
}

/// Create or overwrite a whole file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    /// File to create.
    pub file_name: String,
    /// Full file content.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code: String,
}

/// Structured change proposal produced by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPlan {
    /// Anchored removals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Vec<Deletion>>,
    /// Anchored replacements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify: Option<Vec<Modification>>,
    /// Whole-file creations or overwrites.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_files: Option<Vec<NewFile>>,
    /// Names of files to remove entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_files: Option<Vec<String>>,
    /// Free-form explanation from the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Models sometimes send `null` for an anchor they leave out.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// One operation of a plan, tagged by the group it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Anchored removal.
    Deletion(Deletion),
    /// Anchored replacement.
    Modification(Modification),
    /// Whole-file creation or overwrite.
    NewFile(NewFile),
    /// Whole-file removal.
    DeleteFile(String),
}

/// Discriminant of [`EditOperation`], used in diagnostics and change logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Anchored removal.
    Deletion,
    /// Anchored replacement.
    Modification,
    /// Whole-file creation or overwrite.
    NewFile,
    /// Whole-file removal.
    DeleteFile,
}

impl OperationKind {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deletion => "deletion",
            Self::Modification => "modification",
            Self::NewFile => "new_file",
            Self::DeleteFile => "delete_file",
        }
    }
}

impl EditOperation {
    /// Operation discriminant.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Deletion(_) => OperationKind::Deletion,
            Self::Modification(_) => OperationKind::Modification,
            Self::NewFile(_) => OperationKind::NewFile,
            Self::DeleteFile(_) => OperationKind::DeleteFile,
        }
    }

    /// File the operation targets.
    #[must_use]
    pub fn file_name(&self) -> &str {
        match self {
            Self::Deletion(op) => &op.file_name,
            Self::Modification(op) => &op.file_name,
            Self::NewFile(op) => &op.file_name,
            Self::DeleteFile(name) => name,
        }
    }
}

/// Operation counts per group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Anchored removals.
    pub deletions: usize,
    /// Anchored replacements.
    pub modifications: usize,
    /// Whole-file creations.
    pub new_files: usize,
    /// Whole-file removals.
    pub deleted_files: usize,
}

impl PlanSummary {
    /// Total number of operations.
    #[must_use]
    pub fn total(&self) -> usize {
        self.deletions + self.modifications + self.new_files + self.deleted_files
    }
}

impl EditPlan {
    /// Whether the plan proposes no change at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summary().total() == 0
    }

    /// Operation counts.
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            deletions: self.delete.as_ref().map_or(0, Vec::len),
            modifications: self.modify.as_ref().map_or(0, Vec::len),
            new_files: self.new_files.as_ref().map_or(0, Vec::len),
            deleted_files: self.delete_files.as_ref().map_or(0, Vec::len),
        }
    }

    /// All operations in application order: whole-file deletions, anchored
    /// deletions, modifications, then new files. Each group keeps its listed order.
    #[must_use]
    pub fn operations(&self) -> Vec<EditOperation> {
        let mut ops = Vec::with_capacity(self.summary().total());
        ops.extend(
            self.delete_files
                .iter()
                .flatten()
                .cloned()
                .map(EditOperation::DeleteFile),
        );
        ops.extend(
            self.delete
                .iter()
                .flatten()
                .cloned()
                .map(EditOperation::Deletion),
        );
        ops.extend(
            self.modify
                .iter()
                .flatten()
                .cloned()
                .map(EditOperation::Modification),
        );
        ops.extend(
            self.new_files
                .iter()
                .flatten()
                .cloned()
                .map(EditOperation::NewFile),
        );
        ops
    }
}

/// JSON Schema of [`EditPlan`], embedded into model prompts.
#[must_use]
pub fn edit_plan_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(EditPlan);
    serde_json::to_value(schema).unwrap_or(serde_json::Value::Null)
}
