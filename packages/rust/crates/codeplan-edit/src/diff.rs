//! Diff generation utilities.
//!
//! Unified diffs for previews, rendered with the `similar` crate. Diffs are for
//! humans only; plans are never applied through them.

use similar::TextDiff;

const CONTEXT_LINES: usize = 3;

/// Generate a `git`-style unified diff for one file.
///
/// Returns an empty string when `original` and `modified` are identical.
#[must_use]
pub fn generate_unified_diff(file_name: &str, original: &str, modified: &str) -> String {
    TextDiff::from_lines(original, modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(&format!("a/{file_name}"), &format!("b/{file_name}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_has_headers_and_hunks() {
        let diff = generate_unified_diff("src/a.js", "line1\nold\nline3\n", "line1\nnew\nline3\n");

        assert!(diff.starts_with("--- a/src/a.js\n+++ b/src/a.js\n"));
        assert!(diff.contains("@@ -1,3 +1,3 @@"));
        assert!(diff.contains("-old\n"));
        assert!(diff.contains("+new\n"));
    }

    #[test]
    fn test_identical_content_yields_nothing() {
        assert!(generate_unified_diff("a", "same\n", "same\n").is_empty());
    }

    #[test]
    fn test_creation_diff() {
        let diff = generate_unified_diff("b.css", "", "body{}\n");
        assert!(diff.contains("+body{}"));
    }
}
