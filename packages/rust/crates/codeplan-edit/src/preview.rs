//! File-level change listing between two file sets.

use codeplan_types::FileSet;
use serde::Serialize;

use crate::diff::generate_unified_diff;

/// What happened to a file between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    /// Present only in the new snapshot.
    Added,
    /// Present only in the old snapshot.
    Removed,
    /// Present in both with different content or MIME type.
    Modified,
}

/// One changed file with its rendered diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    /// File name.
    pub file_name: String,
    /// Change status.
    pub status: ChangeStatus,
    /// Whether either side is a binary record (no line diff rendered).
    pub binary: bool,
    /// Unified diff for text files, empty for binary ones.
    pub diff: String,
}

/// List changes from `before` to `after`.
///
/// Added and modified files come first in `after` order, removed files follow in
/// `before` order. Unchanged files are omitted.
#[must_use]
pub fn preview_changes(before: &FileSet, after: &FileSet) -> Vec<FileChange> {
    let mut changes = Vec::new();

    for record in after {
        let previous = before.get(&record.name);
        let status = match previous {
            None => ChangeStatus::Added,
            Some(prev) if prev == record => continue,
            Some(_) => ChangeStatus::Modified,
        };
        let binary = record.is_binary() || previous.is_some_and(|p| p.is_binary());
        let diff = if binary {
            String::new()
        } else {
            let old = previous.map_or("", |p| p.content.as_str());
            generate_unified_diff(&record.name, old, &record.content)
        };
        changes.push(FileChange {
            file_name: record.name.clone(),
            status,
            binary,
            diff,
        });
    }

    for record in before {
        if after.contains(&record.name) {
            continue;
        }
        let binary = record.is_binary();
        let diff = if binary {
            String::new()
        } else {
            generate_unified_diff(&record.name, &record.content, "")
        };
        changes.push(FileChange {
            file_name: record.name.clone(),
            status: ChangeStatus::Removed,
            binary,
            diff,
        });
    }

    changes
}
