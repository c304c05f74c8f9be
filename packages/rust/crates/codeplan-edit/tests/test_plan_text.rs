//! Tests for plan_text module - model output parsing.

use codeplan_edit::{PatchEngine, PlanParseError, parse_edit_plan};
use codeplan_types::{FileRecord, FileSet};

#[test]
fn test_parses_fenced_plan() -> Result<(), PlanParseError> {
    let text = "```json\n{\"deleteFiles\": [\"a.txt\"], \"notes\": \"remove a\"}\n```";
    let plan = parse_edit_plan(text)?;
    assert_eq!(plan.delete_files, Some(vec!["a.txt".to_string()]));
    assert_eq!(plan.notes.as_deref(), Some("remove a"));
    Ok(())
}

#[test]
fn test_parses_bare_plan() -> Result<(), PlanParseError> {
    let plan = parse_edit_plan("  {\"newFiles\": [{\"fileName\": \"x.css\", \"code\": \"body{}\"}]}\n")?;
    assert_eq!(plan.summary().new_files, 1);
    Ok(())
}

#[test]
fn test_null_anchor_costs_nothing() -> Result<(), PlanParseError> {
    let plan = parse_edit_plan(
        r#"{"modify":[{"fileName":"a.js","before":null,"codeToDelete":"old()","newCode":"new()","after":null}]}"#,
    )?;
    let files = FileSet::from_records([FileRecord::new("a.js", "old();", "application/javascript")]);

    let outcome = PatchEngine::apply_plan(&files, &plan);

    assert_eq!(outcome.files.get("a.js").map(|r| r.content.as_str()), Some("new();"));
    assert!(outcome.diagnostics.is_empty());
    Ok(())
}

#[test]
fn test_empty_response() {
    assert!(matches!(parse_edit_plan("   "), Err(PlanParseError::Empty)));
    assert!(matches!(parse_edit_plan("```json\n```"), Err(PlanParseError::Empty)));
}

#[test]
fn test_invalid_json_is_reported() {
    let err = parse_edit_plan("{\"modify\": [").err();
    assert!(matches!(err, Some(PlanParseError::Json(_))));
    let message = err.map(|e| e.to_string()).unwrap_or_default();
    assert!(message.starts_with("Invalid edit plan JSON"));
}

#[test]
fn test_non_object_rejected() {
    assert!(matches!(parse_edit_plan("[1, 2]"), Err(PlanParseError::Json(_))));
}
