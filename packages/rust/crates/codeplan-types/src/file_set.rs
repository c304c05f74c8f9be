//! File records and the ordered, name-unique file set.

use serde::{Deserialize, Serialize};

use crate::mime::{ContentKind, content_kind};

/// One named file in a project snapshot.
///
/// `content` is raw text for text kinds, or a base64 data URI
/// (`data:<mime>;base64,<payload>`) for binary and image kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique key inside a file set. `/` separates directories.
    pub name: String,
    /// Text content or an embedded data URI.
    pub content: String,
    /// MIME type used for rendering and for choosing the patch strategy.
    pub mime_type: String,
}

impl FileRecord {
    /// Create a new file record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Content kind derived from the MIME type.
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        content_kind(&self.mime_type)
    }

    /// Whether the record must be replaced wholesale instead of patched textually.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.kind() == ContentKind::Binary
    }

    /// Return a copy of this record with different content, keeping name and MIME type.
    #[must_use]
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            content: content.into(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Ordered collection of file records with unique names.
///
/// Order is preserved for untouched records; display order is computed separately
/// by the tree projection. Inserting a record whose name already exists replaces it
/// in the slot of the existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<FileRecord>", into = "Vec<FileRecord>")]
pub struct FileSet {
    records: Vec<FileRecord>,
}

impl FileSet {
    /// Create an empty file set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a file set from records. Duplicate names: last write wins.
    pub fn from_records(records: impl IntoIterator<Item = FileRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.position(name).map(|idx| &self.records[idx])
    }

    /// Whether a record with `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert or replace a record, returning the replaced one.
    pub fn insert(&mut self, record: FileRecord) -> Option<FileRecord> {
        match self.position(&record.name) {
            Some(idx) => Some(std::mem::replace(&mut self.records[idx], record)),
            None => {
                self.records.push(record);
                None
            }
        }
    }

    /// Remove a record by name.
    pub fn remove(&mut self, name: &str) -> Option<FileRecord> {
        self.position(name).map(|idx| self.records.remove(idx))
    }

    /// Iterate records in set order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    /// Record names in set order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Borrow the underlying records.
    #[must_use]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Consume the set and return its records.
    #[must_use]
    pub fn into_records(self) -> Vec<FileRecord> {
        self.records
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.name == name)
    }
}

impl From<Vec<FileRecord>> for FileSet {
    fn from(records: Vec<FileRecord>) -> Self {
        Self::from_records(records)
    }
}

impl From<FileSet> for Vec<FileRecord> {
    fn from(set: FileSet) -> Self {
        set.records
    }
}

impl FromIterator<FileRecord> for FileSet {
    fn from_iter<T: IntoIterator<Item = FileRecord>>(iter: T) -> Self {
        Self::from_records(iter)
    }
}

impl IntoIterator for FileSet {
    type Item = FileRecord;
    type IntoIter = std::vec::IntoIter<FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
