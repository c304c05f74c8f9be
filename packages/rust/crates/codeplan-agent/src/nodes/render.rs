use codeplan_agent::{ApproveOutcome, GenerationOutcome, StagedChange, VersionRecord};
use codeplan_edit::{ChangeStatus, Diagnostic, FileChange};
use codeplan_types::Version;

pub(crate) fn print_preview(changes: &[FileChange]) {
    if changes.is_empty() {
        println!("(no file changes)");
        return;
    }
    for change in changes {
        let status = match change.status {
            ChangeStatus::Added => "added",
            ChangeStatus::Removed => "removed",
            ChangeStatus::Modified => "modified",
        };
        println!("{status}: {}", change.file_name);
        if change.binary {
            println!("  (binary content replaced)");
        } else {
            print!("{}", change.diff);
        }
    }
}

pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if diagnostic.reason.is_skip() {
            println!("skipped {diagnostic}");
        } else {
            println!("note {diagnostic}");
        }
    }
}

pub(crate) fn print_staged(staged: &StagedChange) {
    print_preview(&staged.preview);
    print_diagnostics(&staged.outcome.diagnostics);
}

pub(crate) fn print_generation(outcome: &GenerationOutcome, staged: Option<&StagedChange>) {
    match outcome {
        GenerationOutcome::Staged {
            summary,
            applied,
            skipped,
        } => {
            println!(
                "Staged {applied} of {} operations ({skipped} skipped).",
                summary.total()
            );
            if let Some(staged) = staged {
                print_staged(staged);
            }
        }
        GenerationOutcome::NoChanges { diagnostics } => {
            println!("No changes suggested.");
            print_diagnostics(diagnostics);
        }
    }
}

pub(crate) fn print_approval(outcome: &ApproveOutcome) {
    match outcome {
        ApproveOutcome::Applied { version, .. } => match version {
            VersionRecord::Saved(number) => println!("Approved. Previous state saved as version {number}."),
            VersionRecord::NotRecorded(reason) => {
                println!("Approved. History not recorded: {reason}");
            }
        },
        ApproveOutcome::Committed { commit_url, .. } => println!("Committed: {commit_url}"),
    }
}

pub(crate) fn print_versions(versions: &[Version]) {
    if versions.is_empty() {
        println!("No versions recorded.");
        return;
    }
    for version in versions {
        println!("{:>4}  {} files", version.version_number, version.files.len());
    }
}
