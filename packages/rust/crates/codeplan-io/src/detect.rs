//! Binary detection and MIME lookup.
//!
//! Quick binary detection using NULL byte scanning.

use std::path::Path;

use memchr::memchr;

const SNIFF_LEN: usize = 8192;

/// Quick binary detection - checks first 8KB for NULL bytes.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    let check_len = buffer.len().min(SNIFF_LEN);
    memchr(0, &buffer[..check_len]).is_some()
}

/// MIME type for a file on disk, by extension. `None` for unknown extensions.
#[must_use]
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" | "cjs" => "application/javascript",
        "json" => "application/json",
        "md" | "markdown" => "text/markdown",
        "txt" => "text/plain",
        "xml" => "application/xml",
        "ts" | "tsx" => "text/typescript",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}
