//! Content kinds and MIME inference for newly created files.

/// MIME type assigned to new `.js` files.
pub const MIME_JAVASCRIPT: &str = "application/javascript";
/// MIME type assigned to new `.css` files.
pub const MIME_CSS: &str = "text/css";
/// MIME type assigned to new `.html` files.
pub const MIME_HTML: &str = "text/html";
/// Fallback MIME type for new files.
pub const MIME_PLAIN_TEXT: &str = "text/plain";
/// Fallback MIME type for binary content with no known extension.
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// How a record's content is stored and patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Raw text, patched by anchored substring replacement.
    Text,
    /// Data URI payload, only ever replaced wholesale.
    Binary,
}

/// Classify a MIME type.
#[must_use]
pub fn content_kind(mime_type: &str) -> ContentKind {
    let mime = mime_type.trim().to_ascii_lowercase();
    let binary = mime.starts_with("image/")
        || mime.starts_with("audio/")
        || mime.starts_with("video/")
        || mime.starts_with("font/")
        || matches!(
            mime.as_str(),
            MIME_OCTET_STREAM | "application/pdf" | "application/zip"
        );
    if binary {
        ContentKind::Binary
    } else {
        ContentKind::Text
    }
}

/// MIME type for a file created by an edit plan.
///
/// Deliberately small: only brand-new files go through this table, existing
/// records keep whatever type they were loaded with.
#[must_use]
pub fn infer_new_file_mime_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit('/')
        .next()
        .and_then(|base| base.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("js") => MIME_JAVASCRIPT,
        Some("css") => MIME_CSS,
        Some("html") => MIME_HTML,
        _ => MIME_PLAIN_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_only_counts_on_basename() {
        assert_eq!(infer_new_file_mime_type("assets.css/readme"), MIME_PLAIN_TEXT);
        assert_eq!(infer_new_file_mime_type("web/app.JS"), MIME_JAVASCRIPT);
        assert_eq!(infer_new_file_mime_type("Makefile"), MIME_PLAIN_TEXT);
    }

    #[test]
    fn test_content_kind() {
        assert_eq!(content_kind("image/png"), ContentKind::Binary);
        assert_eq!(content_kind("IMAGE/SVG+XML"), ContentKind::Binary);
        assert_eq!(content_kind("text/css"), ContentKind::Text);
        assert_eq!(content_kind("application/json"), ContentKind::Text);
    }
}
