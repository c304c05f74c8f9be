use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use codeplan_agent::{
    ChatPlanClient, GitHubClient, HistoryBackend, PlanSource, RuntimeSettings,
};
use codeplan_io::{LoadOptions, load_file_set};
use codeplan_memory::{JsonFileKeyValueStore, VersionStore, default_version_namespace};
use codeplan_tree::{build_tree, find};
use codeplan_types::FileSet;
use codeplan_window::{DEFAULT_HISTORY_DEPTH, SessionHistory};

pub(crate) fn load_project(dir: &Path) -> Result<FileSet> {
    load_file_set(dir, &LoadOptions::default())
        .with_context(|| format!("failed to load project {}", dir.display()))
}

/// Version store for a project directory (or any other project key).
pub(crate) fn open_version_store(settings: &RuntimeSettings, project_key: &Path) -> Result<VersionStore> {
    let key = std::fs::canonicalize(project_key).unwrap_or_else(|_| project_key.to_path_buf());
    let namespace = default_version_namespace(settings.history.namespace_prefix(), &key);
    match settings.history.backend.unwrap_or_default() {
        HistoryBackend::Memory => Ok(VersionStore::in_memory(namespace)),
        HistoryBackend::File => {
            let path = settings.history.store_path();
            let backend = JsonFileKeyValueStore::open(&path)
                .with_context(|| format!("failed to open version store {}", path.display()))?;
            Ok(VersionStore::new(Arc::new(backend), namespace))
        }
    }
}

pub(crate) fn session_history(settings: &RuntimeSettings) -> SessionHistory {
    SessionHistory::new(settings.history.max_depth.unwrap_or(DEFAULT_HISTORY_DEPTH))
}

pub(crate) fn plan_source(settings: &RuntimeSettings) -> Result<Arc<dyn PlanSource>> {
    let client = ChatPlanClient::from_settings(&settings.llm)?;
    if settings.llm.api_key().is_none() {
        tracing::warn!(endpoint = client.endpoint(), "no model API key configured");
    }
    Ok(Arc::new(client))
}

pub(crate) fn github_client(settings: &RuntimeSettings) -> Result<GitHubClient> {
    GitHubClient::new(settings.github.api_base(), settings.github.token())
        .context("failed to build GitHub client")
}

pub(crate) fn resolve_owner(settings: &RuntimeSettings, owner: Option<String>) -> Result<String> {
    owner
        .or_else(|| settings.github.owner.clone())
        .context("no owner given (use --owner or set github.owner)")
}

/// Expand selected folders into their files. Unknown names are kept as given.
pub(crate) fn expand_selection(files: &FileSet, selected: &[String]) -> Vec<String> {
    let forest = build_tree(files);
    let mut names: Vec<String> = Vec::new();
    for entry in selected {
        let entry = entry.trim().trim_end_matches('/');
        if entry.is_empty() {
            continue;
        }
        match find(&forest, entry) {
            Some(node) => {
                for name in node.file_names() {
                    push_unique(&mut names, name);
                }
            }
            None => push_unique(&mut names, entry),
        }
    }
    names
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|existing| existing == name) {
        names.push(name.to_string());
    }
}
