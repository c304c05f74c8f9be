//! Tests for settings loading and system/user merge.

#![allow(missing_docs)]

use std::fs;

use anyhow::Result;
use codeplan_agent::{
    DEFAULT_GITHUB_API_BASE, DEFAULT_LLM_MODEL, HistoryBackend, load_runtime_settings_from_paths,
};
use tempfile::TempDir;

#[test]
fn test_user_overrides_system_field_by_field() -> Result<()> {
    let dir = TempDir::new()?;
    let system = dir.path().join("system.yaml");
    let user = dir.path().join("user.yaml");
    fs::write(
        &system,
        "llm:\n  base_url: http://system/v1\n  model: big\n  timeout_secs: 30\nhistory:\n  max_depth: 20\n  backend: memory\n",
    )?;
    fs::write(&user, "llm:\n  model: small\nhistory:\n  max_depth: 5\n")?;

    let settings = load_runtime_settings_from_paths(&system, &user);

    assert_eq!(settings.llm.base_url(), "http://system/v1");
    assert_eq!(settings.llm.model(), "small");
    assert_eq!(settings.llm.timeout_secs(), 30);
    assert_eq!(settings.history.max_depth, Some(5));
    assert_eq!(settings.history.backend, Some(HistoryBackend::Memory));
    Ok(())
}

#[test]
fn test_missing_files_yield_defaults() -> Result<()> {
    let dir = TempDir::new()?;

    let settings = load_runtime_settings_from_paths(
        &dir.path().join("absent-system.yaml"),
        &dir.path().join("absent-user.yaml"),
    );

    assert_eq!(settings.llm.model(), DEFAULT_LLM_MODEL);
    assert_eq!(settings.github.api_base(), DEFAULT_GITHUB_API_BASE);
    assert_eq!(settings.history.backend, None);
    assert_eq!(settings.history.namespace_prefix(), "codeplan");
    Ok(())
}

#[test]
fn test_malformed_file_is_ignored() -> Result<()> {
    let dir = TempDir::new()?;
    let system = dir.path().join("system.yaml");
    let user = dir.path().join("user.yaml");
    fs::write(&system, "github:\n  owner: octo\n")?;
    fs::write(&user, "github: [not, a, map\n")?;

    let settings = load_runtime_settings_from_paths(&system, &user);

    assert_eq!(settings.github.owner.as_deref(), Some("octo"));
    Ok(())
}

#[test]
fn test_unknown_backend_rejects_file() -> Result<()> {
    let dir = TempDir::new()?;
    let system = dir.path().join("system.yaml");
    fs::write(&system, "history:\n  backend: redis\n  max_depth: 3\n")?;

    let settings = load_runtime_settings_from_paths(&system, &dir.path().join("none.yaml"));

    assert_eq!(settings.history.max_depth, None);
    Ok(())
}
