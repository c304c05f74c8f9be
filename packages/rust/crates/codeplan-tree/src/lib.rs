//! codeplan-tree - display tree for a flat file set.
//!
//! File names are split on `/`; every directory segment becomes (or reuses) a
//! directory node and the last segment becomes a file leaf. At every level
//! directories come before files, each group in case-sensitive lexical order.

use std::collections::BTreeMap;

use codeplan_types::{FileRecord, FileSet};
use serde::Serialize;

/// Path separator inside file names.
pub const SEPARATOR: char = '/';

/// One node of the projected tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// Intermediate directory.
    Directory {
        /// Last path segment.
        name: String,
        /// Full path from the root, without trailing separator.
        path: String,
        /// Children, directories first.
        children: Vec<TreeNode>,
    },
    /// File leaf.
    File {
        /// Last path segment.
        name: String,
        /// The record this leaf stands for (its `name` is the full path).
        record: FileRecord,
    },
}

impl TreeNode {
    /// Last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory { name, .. } | Self::File { name, .. } => name,
        }
    }

    /// Full path of the node.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Directory { path, .. } => path,
            Self::File { record, .. } => &record.name,
        }
    }

    /// Whether this is a directory.
    #[must_use]
    pub fn is_directory(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    /// Every file name at or below this node, in display order.
    ///
    /// Selecting a directory selects exactly these files.
    #[must_use]
    pub fn file_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_file_names(&mut names);
        names
    }

    fn collect_file_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Directory { children, .. } => {
                for child in children {
                    child.collect_file_names(out);
                }
            }
            Self::File { record, .. } => out.push(&record.name),
        }
    }

    /// Find the node at `path` within this subtree (including itself).
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path() == path {
            return Some(self);
        }
        match self {
            Self::Directory { children, .. } => {
                let nested = path
                    .strip_prefix(self.path())
                    .is_some_and(|rest| rest.starts_with(SEPARATOR));
                if nested { find(children, path) } else { None }
            }
            Self::File { .. } => None,
        }
    }

    /// Number of files at or below this node.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match self {
            Self::Directory { children, .. } => children.iter().map(Self::file_count).sum(),
            Self::File { .. } => 1,
        }
    }
}

/// Build the display forest for `files`.
#[must_use]
pub fn build_tree(files: &FileSet) -> Vec<TreeNode> {
    let mut root = DirBuilder::default();
    for record in files {
        root.insert(record);
    }
    root.into_children("")
}

/// Find the node at `path` (directory path or full file name).
#[must_use]
pub fn find<'a>(forest: &'a [TreeNode], path: &str) -> Option<&'a TreeNode> {
    forest.iter().find_map(|node| node.find(path))
}

/// Every file name in the forest, in display order.
#[must_use]
pub fn display_order(forest: &[TreeNode]) -> Vec<&str> {
    forest.iter().flat_map(TreeNode::file_names).collect()
}

/// Render the forest as an indented listing, one node per line.
#[must_use]
pub fn render_tree(forest: &[TreeNode]) -> String {
    let mut output = String::new();
    render_level(forest, 0, &mut output);
    output
}

fn render_level(nodes: &[TreeNode], depth: usize, out: &mut String) {
    for node in nodes {
        out.push_str(&"  ".repeat(depth));
        match node {
            TreeNode::Directory { name, children, .. } => {
                out.push_str(name);
                out.push(SEPARATOR);
                out.push('\n');
                render_level(children, depth + 1, out);
            }
            TreeNode::File { name, .. } => {
                out.push_str(name);
                out.push('\n');
            }
        }
    }
}

#[derive(Default)]
struct DirBuilder {
    dirs: BTreeMap<String, DirBuilder>,
    files: BTreeMap<String, FileRecord>,
}

impl DirBuilder {
    fn insert(&mut self, record: &FileRecord) {
        let segments: Vec<&str> = record
            .name
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect();
        let Some((leaf, dirs)) = segments.split_last() else {
            // Name made only of separators: keep it visible at the root.
            self.files.insert(record.name.clone(), record.clone());
            return;
        };

        let mut current = self;
        for dir in dirs {
            current = current.dirs.entry((*dir).to_string()).or_default();
        }
        // Same normalized path twice: last one wins.
        current.files.insert((*leaf).to_string(), record.clone());
    }

    fn into_children(self, parent_path: &str) -> Vec<TreeNode> {
        let mut nodes = Vec::with_capacity(self.dirs.len() + self.files.len());
        for (name, builder) in self.dirs {
            let path = if parent_path.is_empty() {
                name.clone()
            } else {
                format!("{parent_path}{SEPARATOR}{name}")
            };
            let children = builder.into_children(&path);
            nodes.push(TreeNode::Directory {
                name,
                path,
                children,
            });
        }
        for (name, record) in self.files {
            nodes.push(TreeNode::File { name, record });
        }
        nodes
    }
}
