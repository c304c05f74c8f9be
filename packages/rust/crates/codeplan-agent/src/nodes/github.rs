use std::path::Path;

use anyhow::{Context, Result};
use codeplan_agent::{RepositoryClient, RuntimeSettings, TreeUpdate};
use codeplan_io::{LoadOptions, load_file_set};
use codeplan_types::FileSet;

use super::bootstrap::{github_client, resolve_owner};
use super::local::write_back;
use crate::cli::GithubCommand;

/// Largest blob the git data API accepts.
const PUSH_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

pub(crate) async fn run_github_command(
    action: GithubCommand,
    runtime_settings: &RuntimeSettings,
) -> Result<()> {
    let client = github_client(runtime_settings)?;
    match action {
        GithubCommand::Repos { owner } => {
            let owner = resolve_owner(runtime_settings, owner)?;
            for repo in client.list_repositories(&owner).await? {
                let visibility = if repo.private { "private" } else { "public" };
                println!("{}  ({visibility}, {})", repo.full_name, repo.default_branch);
            }
        }
        GithubCommand::Pull { owner, repo, out } => {
            let owner = resolve_owner(runtime_settings, owner)?;
            let files = client.fetch_contents(&owner, &repo).await?;
            std::fs::create_dir_all(&out)?;
            write_back(&out, &FileSet::new(), &files)?;
        }
        GithubCommand::Push {
            owner,
            repo,
            dir,
            message,
        } => {
            let owner = resolve_owner(runtime_settings, owner)?;
            let remote = client.fetch_contents(&owner, &repo).await?;
            let update = push_update(&dir, &remote)?;
            if update.is_empty() {
                println!("Nothing to push.");
                return Ok(());
            }
            let url = client.commit(&owner, &repo, &update, &message).await?;
            println!("Committed: {url}");
        }
    }
    Ok(())
}

/// Changes that bring `remote` in line with `dir`.
///
/// Every local file is read, hidden and binary ones included. A remote file is
/// only removed when it no longer exists on disk, so files the loader skips
/// (vendored directories, oversized blobs) stay on the branch.
fn push_update(dir: &Path, remote: &FileSet) -> Result<TreeUpdate> {
    let options = LoadOptions {
        max_file_size: PUSH_MAX_FILE_SIZE,
        skip_hidden: false,
        include_binary: true,
        ..LoadOptions::default()
    };
    let local = load_file_set(dir, &options)
        .with_context(|| format!("failed to load project {}", dir.display()))?;

    let mut after = remote.clone();
    for record in &local {
        after.insert(record.clone());
    }
    for record in remote {
        if !local.contains(&record.name) && !dir.join(&record.name).exists() {
            after.remove(&record.name);
        }
    }
    Ok(TreeUpdate::between(remote, &after))
}
