//! Integration tests for SessionHistory.

use codeplan_types::{FileRecord, FileSet};
use codeplan_window::{DEFAULT_HISTORY_DEPTH, SessionHistory};

fn snapshot(tag: usize) -> FileSet {
    FileSet::from_records([FileRecord::new("state.txt", tag.to_string(), "text/plain")])
}

fn tag_of(files: &FileSet) -> Option<String> {
    files.get("state.txt").map(|r| r.content.clone())
}

#[test]
fn test_push_pop_most_recent_first() {
    let mut history = SessionHistory::default();
    history.push(snapshot(1));
    history.push(snapshot(2));

    assert_eq!(history.pop().as_ref().and_then(tag_of), Some("2".to_string()));
    assert_eq!(history.pop().as_ref().and_then(tag_of), Some("1".to_string()));
    assert!(history.pop().is_none());
}

#[test]
fn test_bound_evicts_oldest() {
    let mut history = SessionHistory::default();
    for i in 1..=11 {
        history.push(snapshot(i));
    }

    assert_eq!(history.len(), DEFAULT_HISTORY_DEPTH);
    assert_eq!(history.peek().and_then(tag_of), Some("11".to_string()));

    let mut popped = Vec::new();
    while let Some(files) = history.pop() {
        popped.extend(tag_of(&files));
    }
    assert_eq!(popped.len(), 10);
    assert_eq!(popped.last().map(String::as_str), Some("2"));
    assert!(!popped.iter().any(|t| t == "1"));
}

#[test]
fn test_zero_depth_is_clamped() {
    let mut history = SessionHistory::new(0);
    history.push(snapshot(1));
    history.push(snapshot(2));
    assert_eq!(history.max_depth(), 1);
    assert_eq!(history.len(), 1);
    assert_eq!(history.peek().and_then(tag_of), Some("2".to_string()));
}

#[test]
fn test_clear() {
    let mut history = SessionHistory::new(3);
    history.push(snapshot(1));
    history.clear();
    assert!(history.is_empty());
}
