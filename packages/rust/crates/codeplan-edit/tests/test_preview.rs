//! Tests for preview module - file-level change listing.

use codeplan_edit::{ChangeStatus, preview_changes};
use codeplan_types::{FileRecord, FileSet};

#[test]
fn test_lists_added_modified_and_removed() {
    let before = FileSet::from_records([
        FileRecord::new("keep.txt", "same\n", "text/plain"),
        FileRecord::new("edit.txt", "old\n", "text/plain"),
        FileRecord::new("drop.txt", "bye\n", "text/plain"),
    ]);
    let after = FileSet::from_records([
        FileRecord::new("keep.txt", "same\n", "text/plain"),
        FileRecord::new("edit.txt", "new\n", "text/plain"),
        FileRecord::new("add.css", "body{}\n", "text/css"),
    ]);

    let changes = preview_changes(&before, &after);
    let summary: Vec<(&str, ChangeStatus)> = changes
        .iter()
        .map(|c| (c.file_name.as_str(), c.status))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("edit.txt", ChangeStatus::Modified),
            ("add.css", ChangeStatus::Added),
            ("drop.txt", ChangeStatus::Removed),
        ]
    );
    assert!(changes[0].diff.contains("-old"));
    assert!(changes[0].diff.contains("+new"));
    assert!(changes[1].diff.contains("+body{}"));
    assert!(changes[2].diff.contains("-bye"));
}

#[test]
fn test_binary_changes_have_no_diff() {
    let before = FileSet::from_records([FileRecord::new("a.png", "data:image/png;base64,AA", "image/png")]);
    let after = FileSet::from_records([FileRecord::new("a.png", "data:image/png;base64,BB", "image/png")]);

    let changes = preview_changes(&before, &after);

    assert_eq!(changes.len(), 1);
    assert!(changes[0].binary);
    assert!(changes[0].diff.is_empty());
}

#[test]
fn test_identical_sets_have_no_changes() {
    let files = FileSet::from_records([FileRecord::new("a", "x", "text/plain")]);
    assert!(preview_changes(&files, &files).is_empty());
}
