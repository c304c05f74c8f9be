use std::path::Path;

use anyhow::{Context, Result};
use codeplan_agent::{EditSession, GenerationOutcome, RuntimeSettings, SessionTarget};
use codeplan_edit::{PatchEngine, parse_edit_plan, preview_changes};
use codeplan_io::sync_file_set;
use codeplan_tree::{build_tree, render_tree};
use codeplan_types::FileSet;
use tokio::io::AsyncReadExt;

use super::bootstrap::{
    expand_selection, load_project, open_version_store, plan_source, session_history,
};
use super::render::{print_approval, print_diagnostics, print_generation, print_preview};

pub(crate) async fn run_apply_mode(
    dir: &Path,
    plan_path: &Path,
    write: bool,
    runtime_settings: &RuntimeSettings,
) -> Result<()> {
    let files = load_project(dir)?;
    let text = read_plan_text(plan_path).await?;
    let plan = parse_edit_plan(&text)?;

    let outcome = PatchEngine::apply_plan(&files, &plan);
    print_preview(&preview_changes(&files, &outcome.files));
    print_diagnostics(&outcome.diagnostics);

    if !write {
        return Ok(());
    }
    if outcome.changes.is_empty() {
        println!("Nothing to write.");
        return Ok(());
    }
    let versions = open_version_store(runtime_settings, dir)?;
    match versions.save(&files) {
        Ok(number) => println!("Previous state saved as version {number}."),
        Err(error) => {
            tracing::warn!(error = %error, "history not recorded");
            println!("History not recorded: {error}");
        }
    }
    write_back(dir, &files, &outcome.files)
}

async fn read_plan_text(plan_path: &Path) -> Result<String> {
    if plan_path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("failed to read plan from stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(plan_path)
        .await
        .with_context(|| format!("failed to read plan {}", plan_path.display()))
}

pub(crate) async fn run_generate_mode(
    dir: &Path,
    instruction: &str,
    select: Vec<String>,
    model: Option<String>,
    write: bool,
    runtime_settings: &RuntimeSettings,
) -> Result<()> {
    let files = load_project(dir)?;
    let selected = expand_selection(&files, &select);
    let mut session = EditSession::new(
        files,
        plan_source(runtime_settings)?,
        open_version_store(runtime_settings, dir)?,
        SessionTarget::Local,
    )
    .with_history(session_history(runtime_settings));
    if let Some(model) = model {
        session = session.with_model(model);
    }

    let outcome = session.generate(instruction, &selected).await?;
    print_generation(&outcome, session.staged());

    if write && matches!(outcome, GenerationOutcome::Staged { .. }) {
        let approved = session.approve().await?;
        print_approval(&approved);
        write_back(dir, approved.previous(), session.files())?;
    }
    Ok(())
}

pub(crate) fn run_tree_mode(dir: &Path) -> Result<()> {
    let files = load_project(dir)?;
    print!("{}", render_tree(&build_tree(&files)));
    Ok(())
}

pub(crate) fn write_back(dir: &Path, before: &FileSet, after: &FileSet) -> Result<()> {
    let report = sync_file_set(dir, before, after)
        .with_context(|| format!("failed to write project {}", dir.display()))?;
    println!(
        "Wrote {} files, removed {}.",
        report.written.len(),
        report.removed.len()
    );
    Ok(())
}

