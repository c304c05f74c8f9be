//! Turning accumulated model output into an `EditPlan`.

use codeplan_types::EditPlan;

use crate::error::PlanParseError;

/// Strip one surrounding Markdown code fence, if present.
///
/// Handles ```` ```json ```` / ```` ``` ```` openers and a trailing ```` ``` ````.
/// Text without a leading fence is only trimmed.
#[must_use]
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Opener line may carry a language tag.
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse the full model response into an edit plan.
///
/// # Errors
/// `PlanParseError::Empty` for blank output, `PlanParseError::Json` when the text is
/// not one JSON object of the plan shape.
pub fn parse_edit_plan(text: &str) -> Result<EditPlan, PlanParseError> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(PlanParseError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fence_variants() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```{}```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }
}
