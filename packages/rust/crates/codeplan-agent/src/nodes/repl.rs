use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use codeplan_agent::{EditSession, RepositoryClient, RuntimeSettings, SessionError, SessionTarget};
use codeplan_io::sync_file_set;
use codeplan_tree::render_tree;
use codeplan_types::FileSet;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::bootstrap::{
    expand_selection, github_client, load_project, open_version_store, plan_source,
    session_history,
};
use super::render::{print_approval, print_generation, print_staged, print_versions};

const HELP: &str = "\
Type an instruction to generate a change, or:
  :approve        accept the staged change
  :reject         discard the staged change
  :staged         show the staged change again
  :undo           restore the state before the last change
  :select a,b     limit context to files/folders (empty = all)
  :tree           show the file tree
  :versions       list versions
  :restore N      make version N the working set
  :clear-versions delete every version
  :help           this text
  :quit           leave";

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Generate(String),
    Approve,
    Reject,
    Staged,
    Undo,
    Select(Vec<String>),
    Tree,
    Versions,
    Restore(u64),
    ClearVersions,
    Help,
    Quit,
    Unknown(String),
}

fn parse_repl_line(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Some(ReplCommand::Generate(line.to_string()));
    };
    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, arg)| (name, arg.trim()));
    let parsed = match name {
        "approve" | "a" => ReplCommand::Approve,
        "reject" | "r" => ReplCommand::Reject,
        "staged" | "s" => ReplCommand::Staged,
        "undo" | "u" => ReplCommand::Undo,
        "select" => ReplCommand::Select(
            arg.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        "tree" | "t" => ReplCommand::Tree,
        "versions" | "v" => ReplCommand::Versions,
        "restore" => match arg.parse::<u64>() {
            Ok(number) => ReplCommand::Restore(number),
            Err(_) => ReplCommand::Unknown(line.to_string()),
        },
        "clear-versions" => ReplCommand::ClearVersions,
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "q" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    };
    Some(parsed)
}

/// Local sessions mirror every working-set change to disk.
struct DiskMirror {
    dir: PathBuf,
    on_disk: FileSet,
}

impl DiskMirror {
    fn sync(&mut self, files: &FileSet) -> Result<()> {
        let report = sync_file_set(&self.dir, &self.on_disk, files)
            .with_context(|| format!("failed to write project {}", self.dir.display()))?;
        tracing::debug!(
            written = report.written.len(),
            removed = report.removed.len(),
            "project directory updated"
        );
        self.on_disk = files.clone();
        Ok(())
    }
}

pub(crate) async fn run_repl_mode(
    dir: &Path,
    github: Option<String>,
    model: Option<String>,
    runtime_settings: &RuntimeSettings,
) -> Result<()> {
    let (mut session, mut mirror) = match github {
        Some(slug) => {
            let (owner, repo) = slug
                .split_once('/')
                .context("--github expects owner/repo")?;
            let client: Arc<dyn RepositoryClient> = Arc::new(github_client(runtime_settings)?);
            let files = client.fetch_contents(owner, repo).await?;
            let versions = open_version_store(runtime_settings, Path::new(&slug))?;
            let target = SessionTarget::GitHub {
                client,
                owner: owner.to_string(),
                repo: repo.to_string(),
            };
            (
                EditSession::new(files, plan_source(runtime_settings)?, versions, target),
                None,
            )
        }
        None => {
            let files = load_project(dir)?;
            let mirror = DiskMirror {
                dir: dir.to_path_buf(),
                on_disk: files.clone(),
            };
            let versions = open_version_store(runtime_settings, dir)?;
            (
                EditSession::new(files, plan_source(runtime_settings)?, versions, SessionTarget::Local)
                    .with_history(session_history(runtime_settings)),
                Some(mirror),
            )
        }
    };
    if let Some(model) = model {
        session = session.with_model(model);
    }

    println!("{} files loaded. :help for commands.", session.files().len());
    let mut selection: Vec<String> = Vec::new();
    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = reader.next_line().await? {
        let Some(command) = parse_repl_line(&line) else {
            continue;
        };
        let result = run_command(&mut session, &mut selection, command).await;
        match result {
            Ok(ReplFlow::Quit) => break,
            Ok(ReplFlow::Changed) => {
                if let Some(mirror) = mirror.as_mut() {
                    mirror.sync(session.files())?;
                }
            }
            Ok(ReplFlow::Continue) => {}
            Err(error) => println!("{error}"),
        }
    }
    Ok(())
}

enum ReplFlow {
    Continue,
    Changed,
    Quit,
}

async fn run_command(
    session: &mut EditSession,
    selection: &mut Vec<String>,
    command: ReplCommand,
) -> Result<ReplFlow, SessionError> {
    match command {
        ReplCommand::Generate(instruction) => {
            let selected = expand_selection(session.files(), selection);
            let outcome = session.generate(&instruction, &selected).await?;
            print_generation(&outcome, session.staged());
        }
        ReplCommand::Approve => {
            let outcome = session.approve().await?;
            print_approval(&outcome);
            return Ok(ReplFlow::Changed);
        }
        ReplCommand::Reject => {
            session.reject()?;
            println!("Change discarded.");
        }
        ReplCommand::Staged => match session.staged() {
            Some(staged) => print_staged(staged),
            None => println!("Nothing staged."),
        },
        ReplCommand::Undo => {
            let files = session.undo()?;
            println!("Undone. {} files.", files.len());
            return Ok(ReplFlow::Changed);
        }
        ReplCommand::Select(names) => {
            *selection = names;
            if selection.is_empty() {
                println!("Context: all files.");
            } else {
                println!("Context: {}", selection.join(", "));
            }
        }
        ReplCommand::Tree => print!("{}", render_tree(&session.tree())),
        ReplCommand::Versions => print_versions(&session.versions()?),
        ReplCommand::Restore(number) => {
            let files = session.restore_version(number)?;
            println!("Restored version {number}. {} files.", files.len());
            return Ok(ReplFlow::Changed);
        }
        ReplCommand::ClearVersions => {
            session.clear_versions()?;
            println!("All versions deleted.");
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return Ok(ReplFlow::Quit),
        ReplCommand::Unknown(line) => println!("Unknown command {line}. :help lists commands."),
    }
    Ok(ReplFlow::Continue)
}
