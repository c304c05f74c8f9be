//! Prompt assembly for plan generation.

use std::fmt::Write as _;

use codeplan_types::{FileRecord, edit_plan_schema};

use super::PlanRequest;

const RULES: &str = "\
You edit a small project. Reply with exactly one JSON object describing the edit plan and nothing else.
Rules:
- `modify` and `delete` entries locate text by `before` + `codeToDelete` + `after`, which must be copied verbatim from the current file, including whitespace.
- Keep `before` and `after` short but long enough to make the location unique.
- Use `newFiles` for brand-new files and for full rewrites; `code` is the complete file content.
- Use `deleteFiles` to remove whole files by name.
- For image files, only whole-file replacement is possible: put the full data URI in `newCode` and leave the other fields empty.
- Omit groups you do not need.";

/// System prompt: output rules plus the plan JSON Schema.
#[must_use]
pub fn build_system_prompt() -> String {
    let schema = serde_json::to_string_pretty(&edit_plan_schema()).unwrap_or_default();
    format!("{RULES}\n\nJSON Schema of the reply:\n{schema}")
}

/// User prompt: the instruction followed by the selected files.
///
/// Binary records are listed by name and MIME type only.
#[must_use]
pub fn build_user_prompt(request: &PlanRequest<'_>) -> String {
    let mut prompt = format!("Instruction:\n{}\n\nFiles:\n", request.instruction.trim());
    let selected = |record: &&FileRecord| {
        request.selected.is_empty() || request.selected.iter().any(|name| *name == record.name)
    };

    for record in request.files.iter().filter(selected) {
        if record.is_binary() {
            let _ = writeln!(prompt, "--- {} ({}, binary, not shown)", record.name, record.mime_type);
        } else {
            let _ = writeln!(prompt, "--- {} ({})", record.name, record.mime_type);
            prompt.push_str(&record.content);
            if !record.content.ends_with('\n') {
                prompt.push('\n');
            }
        }
    }
    prompt
}
