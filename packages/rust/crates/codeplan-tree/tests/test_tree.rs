//! Tests for the file tree projection.

use codeplan_tree::{TreeNode, build_tree, display_order, find, render_tree};
use codeplan_types::{FileRecord, FileSet};

fn files(names: &[&str]) -> FileSet {
    FileSet::from_records(
        names
            .iter()
            .map(|name| FileRecord::new(*name, format!("// {name}"), "text/plain")),
    )
}

fn top_level_names(forest: &[TreeNode]) -> Vec<&str> {
    forest.iter().map(TreeNode::name).collect()
}

#[test]
fn test_directories_before_files_lexical_within_kind() {
    let forest = build_tree(&files(&["b.txt", "src/main.js", "a.txt", "assets/x.png"]));

    assert_eq!(top_level_names(&forest), vec!["assets", "src", "a.txt", "b.txt"]);
    assert!(forest[0].is_directory());
    assert!(!forest[2].is_directory());
}

#[test]
fn test_ordering_is_case_sensitive() {
    let forest = build_tree(&files(&["b.txt", "B.txt", "a.txt", "A.txt"]));

    assert_eq!(top_level_names(&forest), vec!["A.txt", "B.txt", "a.txt", "b.txt"]);
}

#[test]
fn test_nested_directories_are_shared() {
    let forest = build_tree(&files(&["src/lib/a.js", "src/lib/b.js", "src/index.js"]));

    assert_eq!(forest.len(), 1);
    let TreeNode::Directory { path, children, .. } = &forest[0] else {
        panic!("expected a directory");
    };
    assert_eq!(path, "src");
    assert_eq!(top_level_names(children), vec!["lib", "index.js"]);
    assert_eq!(children[0].path(), "src/lib");
    assert_eq!(forest[0].file_count(), 3);
}

#[test]
fn test_folder_selection_lists_descendants_in_display_order() {
    let forest = build_tree(&files(&["app/z.js", "app/views/home.html", "app/a.js", "root.txt"]));

    let app = find(&forest, "app").map(TreeNode::file_names);
    assert_eq!(
        app,
        Some(vec!["app/views/home.html", "app/a.js", "app/z.js"])
    );
    assert_eq!(
        display_order(&forest),
        vec!["app/views/home.html", "app/a.js", "app/z.js", "root.txt"]
    );
}

#[test]
fn test_find_file_and_missing_paths() {
    let forest = build_tree(&files(&["src/main.js", "src2/other.js"]));

    let leaf = find(&forest, "src/main.js");
    assert!(matches!(leaf, Some(TreeNode::File { name, .. }) if name == "main.js"));
    assert!(find(&forest, "src/missing.js").is_none());
    assert!(find(&forest, "sr").is_none());
    assert_eq!(find(&forest, "src2").map(TreeNode::file_count), Some(1));
}

#[test]
fn test_empty_segments_are_skipped() {
    let forest = build_tree(&files(&["/lead.txt", "dir//inner.txt"]));

    assert_eq!(top_level_names(&forest), vec!["dir", "lead.txt"]);
    let inner = find(&forest, "dir//inner.txt");
    assert!(matches!(inner, Some(TreeNode::File { name, .. }) if name == "inner.txt"));
}

#[test]
fn test_duplicate_normalized_path_last_wins() {
    let set = FileSet::from_records([
        FileRecord::new("a/b.txt", "first", "text/plain"),
        FileRecord::new("a//b.txt", "second", "text/plain"),
    ]);
    let forest = build_tree(&set);

    assert_eq!(forest[0].file_count(), 1);
    let names = forest[0].file_names();
    assert_eq!(names, vec!["a//b.txt"]);
}

#[test]
fn test_render_tree_indents_children() {
    let forest = build_tree(&files(&["src/a.js", "readme.md"]));

    assert_eq!(render_tree(&forest), "src/\n  a.js\nreadme.md\n");
}

#[test]
fn test_empty_set_yields_empty_forest() {
    assert!(build_tree(&FileSet::new()).is_empty());
}

#[test]
fn test_serializes_with_kind_tag() -> anyhow::Result<()> {
    let forest = build_tree(&files(&["d/f.txt"]));
    let value = serde_json::to_value(&forest)?;

    assert_eq!(value[0]["kind"], "directory");
    assert_eq!(value[0]["children"][0]["kind"], "file");
    assert_eq!(value[0]["children"][0]["record"]["name"], "d/f.txt");
    Ok(())
}
