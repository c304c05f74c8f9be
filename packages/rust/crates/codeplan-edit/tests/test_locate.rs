//! Tests for locate module - anchor and fallback matching.

use codeplan_edit::{Replacement, locate_and_replace};

#[test]
fn test_anchored_replaces_first_occurrence_only() {
    let content = "a = 1;\na = 1;\n";
    let result = locate_and_replace(content, "a = ", "1", ";", "2");
    assert_eq!(result, Replacement::Anchored("a = 2;\na = 1;\n".to_string()));
}

#[test]
fn test_anchor_selects_context() {
    let content = "zap BAR baz\nfoo BAR baz\n";
    let result = locate_and_replace(content, "foo ", "BAR", " baz", "QUX");
    assert_eq!(
        result,
        Replacement::Anchored("zap BAR baz\nfoo QUX baz\n".to_string())
    );
}

#[test]
fn test_direct_fallback_when_target_unique() {
    let content = "let total = compute(a);\n";
    let result = locate_and_replace(content, "const ", "compute(a)", ";", "compute(a, b)");
    assert_eq!(
        result,
        Replacement::Direct("let total = compute(a, b);\n".to_string())
    );
}

#[test]
fn test_ambiguous_fallback_rejected() {
    let content = "x BAR y\nz BAR w\n";
    let result = locate_and_replace(content, "nope ", "BAR", " y", "QUX");
    assert_eq!(result, Replacement::Ambiguous { occurrences: 2 });
}

#[test]
fn test_not_found() {
    let result = locate_and_replace("hello", "", "bye", "", "ciao");
    assert_eq!(result, Replacement::NotFound);
}

#[test]
fn test_empty_target_with_stale_anchor() {
    let result = locate_and_replace("abc", "x", "", "y", "new");
    assert_eq!(result, Replacement::EmptyTarget);
}

#[test]
fn test_empty_target_with_matching_anchor_inserts() {
    let result = locate_and_replace("<ul></ul>", "<ul>", "", "</ul>", "<li/>");
    assert_eq!(result, Replacement::Anchored("<ul><li/></ul>".to_string()));
}

#[test]
fn test_everything_empty_never_matches() {
    assert_eq!(
        locate_and_replace("abc", "", "", "", "prefix"),
        Replacement::EmptyTarget
    );
}

#[test]
fn test_deletion_uses_empty_replacement() {
    let content = "keep();\ndrop();\nkeep2();\n";
    let result = locate_and_replace(content, "keep();\n", "drop();\n", "keep2();", "");
    assert_eq!(result, Replacement::Anchored("keep();\nkeep2();\n".to_string()));
}
