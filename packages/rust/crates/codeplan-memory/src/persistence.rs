//! Atomic text writes for file-backed stores.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Replace `path` with `content` so readers see either the old or the new file:
/// write a sibling temp file, fsync it, then rename it over the target.
pub(crate) fn atomic_write_text(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)
        .with_context(|| format!("failed to create store directory {}", parent.display()))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("versions.json");
    let temp_path = parent.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

    let mut temp_file = std::fs::File::create(&temp_path)
        .with_context(|| format!("failed to create {}", temp_path.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .and_then(|()| temp_file.sync_all())
        .with_context(|| format!("failed to write {}", temp_path.display()))?;

    if let Err(error) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(error)
            .with_context(|| format!("failed to move store file into {}", path.display()));
    }
    Ok(())
}
