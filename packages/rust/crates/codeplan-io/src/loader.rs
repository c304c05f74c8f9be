//! Directory <-> FileSet conversion.
//!
//! Loading walks the tree in file-name order so the resulting set is stable
//! across runs. Text files become text records, images become data-URI records,
//! other binary files are skipped unless `include_binary` is set.

use std::fs;
use std::path::{Component, Path, PathBuf};

use codeplan_types::{
    ContentKind, FileRecord, FileSet, MIME_OCTET_STREAM, MIME_PLAIN_TEXT, content_kind,
};
use walkdir::{DirEntry, WalkDir};

use crate::data_uri::{decode_data_uri, encode_data_uri};
use crate::detect::{detect_mime_type, is_binary};
use crate::error::IoError;

/// Options for loading a directory.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Maximum file size in bytes (default: 1MB). Larger files are skipped.
    pub max_file_size: u64,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// Skip directories by name.
    pub skip_dirs: Vec<String>,
    /// Keep binary files that are not images, as `application/octet-stream`
    /// (or their known MIME type) data URIs.
    pub include_binary: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024,
            skip_hidden: true,
            skip_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
            ],
            include_binary: false,
        }
    }
}

impl LoadOptions {
    fn keep(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if self.skip_hidden && name.starts_with('.') {
            return false;
        }
        !(entry.file_type().is_dir() && self.skip_dirs.iter().any(|skip| *skip == name))
    }
}

/// Read every eligible file under `root` into a file set.
///
/// Record names are `/`-separated paths relative to `root`.
///
/// # Errors
/// `IoError::NotFound` when `root` is not a directory; traversal and read errors.
pub fn load_file_set(root: impl AsRef<Path>, options: &LoadOptions) -> Result<FileSet, IoError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(IoError::NotFound(root.display().to_string()));
    }

    let mut files = FileSet::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| options.keep(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(name) = record_name(root, path) else {
            continue;
        };

        let size = entry.metadata()?.len();
        if size > options.max_file_size {
            tracing::debug!(file = %name, size, limit = options.max_file_size, "skipping large file");
            continue;
        }

        let record = record_from_bytes(name, fs::read(path)?);
        if record.is_binary() && !is_image(&record) && !options.include_binary {
            tracing::debug!(path = %path.display(), "skipping binary file");
            continue;
        }
        files.insert(record);
    }

    tracing::info!(root = %root.display(), files = files.len(), "loaded file set");
    Ok(files)
}

fn record_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

fn is_image(record: &FileRecord) -> bool {
    record.mime_type.starts_with("image/")
}

/// Turn raw file bytes into a record without losing any of them.
///
/// The MIME type comes from the extension of `name`. Binary kinds become data
/// URIs. Anything else is text when it is NUL-free UTF-8; otherwise it becomes
/// an `application/octet-stream` data URI so writing it back is byte-exact.
#[must_use]
pub fn record_from_bytes(name: String, bytes: Vec<u8>) -> FileRecord {
    let detected = detect_mime_type(Path::new(&name));
    if let Some(mime) = detected
        && content_kind(mime) == ContentKind::Binary
    {
        return FileRecord::new(name, encode_data_uri(mime, &bytes), mime);
    }
    if is_binary(&bytes) {
        return octet_stream_record(name, &bytes);
    }
    match String::from_utf8(bytes) {
        Ok(text) => FileRecord::new(name, text, detected.unwrap_or(MIME_PLAIN_TEXT)),
        Err(error) => octet_stream_record(name, error.as_bytes()),
    }
}

fn octet_stream_record(name: String, bytes: &[u8]) -> FileRecord {
    FileRecord::new(
        name,
        encode_data_uri(MIME_OCTET_STREAM, bytes),
        MIME_OCTET_STREAM,
    )
}

/// What `sync_file_set` did on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files created or overwritten.
    pub written: Vec<String>,
    /// Files deleted.
    pub removed: Vec<String>,
}

/// Make `root` reflect `after`, given that it currently reflects `before`.
///
/// Only new or changed records are written; records present in `before` but
/// not in `after` are removed. Every name is validated before anything is
/// touched.
///
/// # Errors
/// `IoError::UnsafePath` for names that escape `root`, `IoError::InvalidDataUri`
/// for binary records that cannot be decoded, and filesystem errors.
pub fn sync_file_set(
    root: impl AsRef<Path>,
    before: &FileSet,
    after: &FileSet,
) -> Result<SyncReport, IoError> {
    let root = root.as_ref();

    let mut writes: Vec<(PathBuf, &FileRecord)> = Vec::new();
    for record in after {
        if before.get(&record.name) == Some(record) {
            continue;
        }
        writes.push((safe_join(root, &record.name)?, record));
    }
    let mut removals: Vec<(PathBuf, &str)> = Vec::new();
    for record in before {
        if !after.contains(&record.name) {
            removals.push((safe_join(root, &record.name)?, &record.name));
        }
    }

    let mut report = SyncReport::default();
    for (path, record) in writes {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if record.is_binary() {
            let bytes = decode_data_uri(&record.content)
                .ok_or_else(|| IoError::InvalidDataUri(record.name.clone()))?;
            fs::write(&path, bytes)?;
        } else {
            fs::write(&path, &record.content)?;
        }
        report.written.push(record.name.clone());
    }
    for (path, name) in removals {
        match fs::remove_file(&path) {
            Ok(()) => report.removed.push(name.to_string()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }
    }

    tracing::info!(
        root = %root.display(),
        written = report.written.len(),
        removed = report.removed.len(),
        "synced file set"
    );
    Ok(report)
}

fn safe_join(root: &Path, name: &str) -> Result<PathBuf, IoError> {
    let relative = Path::new(name);
    let escapes = relative.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes || name.trim_matches('/').is_empty() {
        return Err(IoError::UnsafePath(name.to_string()));
    }
    Ok(root.join(relative))
}
