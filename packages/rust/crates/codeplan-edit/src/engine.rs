//! Patch engine: applies an `EditPlan` to a `FileSet`.
//!
//! Pure and total. The input set is cloned once; every operation then works on the
//! result of the previous one, so edits to the same file compose in plan order.

use codeplan_types::{
    EditOperation, EditPlan, FileRecord, FileSet, NewFile, OperationKind,
    infer_new_file_mime_type,
};

use crate::locate::{Replacement, locate_and_replace};
use crate::types::{AppliedChange, Diagnostic, DiagnosticReason, MatchStrategy, PatchOutcome};

/// PatchEngine - deterministic edit plan application.
///
/// Order of application:
/// 1. `deleteFiles`
/// 2. `delete` entries, then `modify` entries, each group in listed order
/// 3. `newFiles`
///
/// # Example
///
/// ```rust
/// use codeplan_edit::PatchEngine;
/// use codeplan_types::{EditPlan, FileRecord, FileSet};
///
/// let files = FileSet::from_records([FileRecord::new("old.txt", "", "text/plain")]);
/// let plan = EditPlan { delete_files: Some(vec!["old.txt".to_string()]), ..EditPlan::default() };
/// let outcome = PatchEngine::apply_plan(&files, &plan);
/// assert!(outcome.files.is_empty());
/// ```
pub struct PatchEngine;

impl PatchEngine {
    /// Apply `plan` to `files`, returning a fresh file set plus diagnostics.
    #[must_use]
    pub fn apply_plan(files: &FileSet, plan: &EditPlan) -> PatchOutcome {
        let mut application = Application::new(files.clone());
        let mut cursor = GroupCursor::default();

        for operation in plan.operations() {
            let index = cursor.next(operation.kind());
            match operation {
                EditOperation::DeleteFile(name) => application.delete_file(index, &name),
                EditOperation::Deletion(op) => application.patch_in_place(
                    OperationKind::Deletion,
                    index,
                    &op.file_name,
                    Anchors {
                        before: &op.before,
                        target: &op.code_to_delete,
                        after: &op.after,
                    },
                    None,
                ),
                EditOperation::Modification(op) => application.patch_in_place(
                    OperationKind::Modification,
                    index,
                    &op.file_name,
                    Anchors {
                        before: &op.before,
                        target: &op.code_to_delete,
                        after: &op.after,
                    },
                    Some(&op.new_code),
                ),
                EditOperation::NewFile(op) => application.write_new_file(index, op),
            }
        }

        let outcome = application.finish();
        tracing::debug!(
            applied = outcome.changes.len(),
            skipped = outcome.diagnostics.iter().filter(|d| d.reason.is_skip()).count(),
            files = outcome.files.len(),
            "edit plan applied"
        );
        outcome
    }

    /// Format an outcome for display.
    ///
    /// Returns a human-readable summary of applied and skipped operations.
    #[must_use]
    pub fn format_outcome(outcome: &PatchOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("// Applied: {}\n", outcome.changes.len()));

        for change in &outcome.changes {
            output.push_str(&format!(
                "{}[{}] {} ({:?})\n",
                change.operation.as_str(),
                change.index,
                change.file_name,
                change.strategy
            ));
        }

        if !outcome.diagnostics.is_empty() {
            output.push_str(&format!("\n// Diagnostics: {}\n", outcome.diagnostics.len()));
            for diagnostic in &outcome.diagnostics {
                output.push_str(&format!("{diagnostic}\n"));
            }
        }

        output
    }
}

/// Convenience wrapper around [`PatchEngine::apply_plan`].
#[must_use]
pub fn apply_plan(files: &FileSet, plan: &EditPlan) -> PatchOutcome {
    PatchEngine::apply_plan(files, plan)
}

struct Anchors<'a> {
    before: &'a str,
    target: &'a str,
    after: &'a str,
}

/// Per-group operation counters, so diagnostics point at the plan array index.
#[derive(Default)]
struct GroupCursor {
    delete_files: usize,
    deletions: usize,
    modifications: usize,
    new_files: usize,
}

impl GroupCursor {
    fn next(&mut self, kind: OperationKind) -> usize {
        let slot = match kind {
            OperationKind::DeleteFile => &mut self.delete_files,
            OperationKind::Deletion => &mut self.deletions,
            OperationKind::Modification => &mut self.modifications,
            OperationKind::NewFile => &mut self.new_files,
        };
        let index = *slot;
        *slot += 1;
        index
    }
}

struct Application {
    files: FileSet,
    changes: Vec<AppliedChange>,
    diagnostics: Vec<Diagnostic>,
}

impl Application {
    fn new(files: FileSet) -> Self {
        Self {
            files,
            changes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn finish(self) -> PatchOutcome {
        PatchOutcome {
            files: self.files,
            changes: self.changes,
            diagnostics: self.diagnostics,
        }
    }

    fn delete_file(&mut self, index: usize, name: &str) {
        if self.files.remove(name).is_some() {
            tracing::debug!(file_name = name, index, "file removed");
            self.record(OperationKind::DeleteFile, index, name, MatchStrategy::Removed);
        } else {
            tracing::debug!(file_name = name, index, "file already absent; nothing to remove");
        }
    }

    fn patch_in_place(
        &mut self,
        operation: OperationKind,
        index: usize,
        file_name: &str,
        anchors: Anchors<'_>,
        new_code: Option<&str>,
    ) {
        let Some(record) = self.files.get(file_name).cloned() else {
            self.skip(operation, index, file_name, DiagnosticReason::MissingFile);
            return;
        };

        if record.is_binary() {
            match new_code {
                Some(code) => {
                    self.files.insert(record.with_content(code));
                    self.record(operation, index, file_name, MatchStrategy::WholeValue);
                }
                None => self.skip(operation, index, file_name, DiagnosticReason::BinaryDeletion),
            }
            return;
        }

        let replacement = locate_and_replace(
            &record.content,
            anchors.before,
            anchors.target,
            anchors.after,
            new_code.unwrap_or_default(),
        );
        match replacement {
            Replacement::Anchored(content) => {
                self.files.insert(record.with_content(content));
                self.record(operation, index, file_name, MatchStrategy::Anchored);
            }
            Replacement::Direct(content) => {
                tracing::debug!(
                    file_name,
                    index,
                    operation = operation.as_str(),
                    "anchor did not match; applied unique target directly"
                );
                self.files.insert(record.with_content(content));
                self.record(operation, index, file_name, MatchStrategy::Direct);
            }
            Replacement::NotFound => {
                self.skip(operation, index, file_name, DiagnosticReason::NotFound);
            }
            Replacement::Ambiguous { occurrences } => self.skip(
                operation,
                index,
                file_name,
                DiagnosticReason::Ambiguous { occurrences },
            ),
            Replacement::EmptyTarget => {
                self.skip(operation, index, file_name, DiagnosticReason::EmptyTarget);
            }
        }
    }

    fn write_new_file(&mut self, index: usize, op: NewFile) {
        let existing_mime = self.files.get(&op.file_name).map(|r| r.mime_type.clone());
        match existing_mime {
            Some(mime_type) => {
                tracing::warn!(
                    file_name = %op.file_name,
                    index,
                    "new file entry overwrites an existing file"
                );
                self.diagnostics.push(Diagnostic {
                    index,
                    operation: OperationKind::NewFile,
                    file_name: op.file_name.clone(),
                    reason: DiagnosticReason::Overwrote,
                });
                self.record(
                    OperationKind::NewFile,
                    index,
                    &op.file_name,
                    MatchStrategy::Overwritten,
                );
                self.files
                    .insert(FileRecord::new(op.file_name, op.code, mime_type));
            }
            None => {
                let mime_type = infer_new_file_mime_type(&op.file_name);
                tracing::debug!(file_name = %op.file_name, index, mime_type, "file created");
                self.record(
                    OperationKind::NewFile,
                    index,
                    &op.file_name,
                    MatchStrategy::Created,
                );
                self.files
                    .insert(FileRecord::new(op.file_name, op.code, mime_type));
            }
        }
    }

    fn record(
        &mut self,
        operation: OperationKind,
        index: usize,
        file_name: &str,
        strategy: MatchStrategy,
    ) {
        self.changes.push(AppliedChange {
            index,
            operation,
            file_name: file_name.to_string(),
            strategy,
        });
    }

    fn skip(
        &mut self,
        operation: OperationKind,
        index: usize,
        file_name: &str,
        reason: DiagnosticReason,
    ) {
        tracing::warn!(
            file_name,
            index,
            operation = operation.as_str(),
            reason = %reason.describe(),
            "edit operation skipped"
        );
        self.diagnostics.push(Diagnostic {
            index,
            operation,
            file_name: file_name.to_string(),
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_cursor_counts_per_group() {
        let mut cursor = GroupCursor::default();
        assert_eq!(cursor.next(OperationKind::Deletion), 0);
        assert_eq!(cursor.next(OperationKind::Modification), 0);
        assert_eq!(cursor.next(OperationKind::Deletion), 1);
        assert_eq!(cursor.next(OperationKind::NewFile), 0);
    }

    #[test]
    fn test_format_outcome_lists_diagnostics() {
        let files = FileSet::new();
        let plan = EditPlan {
            delete: Some(vec![codeplan_types::Deletion {
                file_name: "missing.js".to_string(),
                code_to_delete: "x".to_string(),
                ..Default::default()
            }]),
            ..EditPlan::default()
        };
        let outcome = PatchEngine::apply_plan(&files, &plan);
        let formatted = PatchEngine::format_outcome(&outcome);

        assert!(formatted.contains("Applied: 0"));
        assert!(formatted.contains("deletion[0] missing.js: file not found"));
    }
}
