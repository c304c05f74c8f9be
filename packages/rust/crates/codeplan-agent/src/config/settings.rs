//! Runtime settings loader for codeplan.
//!
//! Loads and merges:
//! - System defaults: `<CODEPLAN_ROOT>/conf/codeplan.yaml`
//! - User overrides:  `<CODEPLAN_CONFIG_HOME>/codeplan/settings.yaml`
//!
//! Merge precedence is user over system, field by field.

use std::path::{Path, PathBuf};

use codeplan_io::ProjectDirs;
use serde::Deserialize;

const DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH: &str = "conf/codeplan.yaml";
const DEFAULT_USER_SETTINGS_RELATIVE_PATH: &str = "codeplan/settings.yaml";
const DEFAULT_VERSION_STORE_RELATIVE_PATH: &str = "codeplan/versions.json";
const DEFAULT_VERSION_NAMESPACE_PREFIX: &str = "codeplan";

/// OpenAI-compatible endpoint used when none is configured.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Model used when none is configured.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
/// Environment variable holding the model API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Whole-request timeout for plan generation.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 180;
/// GitHub REST API root.
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
/// Environment variable holding the GitHub token.
pub const DEFAULT_GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Merged settings file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeSettings {
    /// Model endpoint.
    #[serde(default)]
    pub llm: LlmSettings,
    /// GitHub access.
    #[serde(default)]
    pub github: GitHubSettings,
    /// Undo depth and version store.
    #[serde(default)]
    pub history: HistorySettings,
}

/// `llm:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmSettings {
    /// Base URL; `/chat/completions` is appended.
    pub base_url: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// Name of the environment variable that holds the API key.
    pub api_key_env: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `github:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubSettings {
    /// REST API root.
    pub api_base: Option<String>,
    /// Name of the environment variable that holds the token.
    pub token_env: Option<String>,
    /// Default owner for `github` commands.
    pub owner: Option<String>,
}

/// `history:` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistorySettings {
    /// Session undo depth.
    pub max_depth: Option<usize>,
    /// Version store backend.
    pub backend: Option<HistoryBackend>,
    /// File path for the `file` backend.
    pub path: Option<String>,
    /// Key namespace prefix.
    pub namespace: Option<String>,
}

/// Where versions are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryBackend {
    /// JSON file under the data home.
    #[default]
    File,
    /// Process memory; lost on exit.
    Memory,
}

impl RuntimeSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            llm: self.llm.merge(overlay.llm),
            github: self.github.merge(overlay.github),
            history: self.history.merge(overlay.history),
        }
    }
}

impl LlmSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            base_url: overlay.base_url.or(self.base_url),
            model: overlay.model.or(self.model),
            api_key_env: overlay.api_key_env.or(self.api_key_env),
            timeout_secs: overlay.timeout_secs.or(self.timeout_secs),
        }
    }

    /// Configured base URL or the default.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_LLM_BASE_URL)
    }

    /// Configured model or the default.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_LLM_MODEL)
    }

    /// API key read from the configured environment variable.
    #[must_use]
    pub fn api_key(&self) -> Option<String> {
        let var = self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);
        non_empty_env(var)
    }

    /// Request timeout.
    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
    }
}

impl GitHubSettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            api_base: overlay.api_base.or(self.api_base),
            token_env: overlay.token_env.or(self.token_env),
            owner: overlay.owner.or(self.owner),
        }
    }

    /// Configured API root or the default.
    #[must_use]
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_GITHUB_API_BASE)
    }

    /// Token read from the configured environment variable.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        let var = self.token_env.as_deref().unwrap_or(DEFAULT_GITHUB_TOKEN_ENV);
        non_empty_env(var)
    }
}

impl HistorySettings {
    fn merge(self, overlay: Self) -> Self {
        Self {
            max_depth: overlay.max_depth.or(self.max_depth),
            backend: overlay.backend.or(self.backend),
            path: overlay.path.or(self.path),
            namespace: overlay.namespace.or(self.namespace),
        }
    }

    /// Version store file, anchored to the data home when relative.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        match self.path.as_deref() {
            Some(path) => absolutize(&ProjectDirs::data_home(), PathBuf::from(path)),
            None => ProjectDirs::data_home().join(DEFAULT_VERSION_STORE_RELATIVE_PATH),
        }
    }

    /// Namespace prefix for version keys.
    #[must_use]
    pub fn namespace_prefix(&self) -> &str {
        self.namespace
            .as_deref()
            .unwrap_or(DEFAULT_VERSION_NAMESPACE_PREFIX)
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load merged runtime settings (user overrides system).
#[must_use]
pub fn load_runtime_settings() -> RuntimeSettings {
    let (system_path, user_path) = runtime_settings_paths();
    load_runtime_settings_from_paths(&system_path, &user_path)
}

/// `(system, user)` settings file locations.
#[must_use]
pub fn runtime_settings_paths() -> (PathBuf, PathBuf) {
    let system_path = ProjectDirs::project_root().join(DEFAULT_SYSTEM_SETTINGS_RELATIVE_PATH);
    let user_path = ProjectDirs::config_home().join(DEFAULT_USER_SETTINGS_RELATIVE_PATH);
    (system_path, user_path)
}

/// Load and merge two explicit settings files. Missing files count as empty.
#[must_use]
pub fn load_runtime_settings_from_paths(system: &Path, user: &Path) -> RuntimeSettings {
    load_one(system).merge(load_one(user))
}

fn load_one(path: &Path) -> RuntimeSettings {
    if !path.exists() {
        return RuntimeSettings::default();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read settings file; ignoring"
            );
            return RuntimeSettings::default();
        }
    };
    if raw.trim().is_empty() {
        return RuntimeSettings::default();
    }
    match serde_yaml::from_str::<RuntimeSettings>(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse settings yaml; ignoring file"
            );
            RuntimeSettings::default()
        }
    }
}

/// Set config-home override (used by CLI `--conf`).
///
/// The path can be absolute, or relative to `CODEPLAN_ROOT`/cwd.
pub fn set_config_home_override(path: impl Into<PathBuf>) {
    let path = path.into();
    if path.as_os_str().is_empty() {
        return;
    }
    if !ProjectDirs::set_config_home(&path) {
        tracing::warn!(
            current = %ProjectDirs::config_home().display(),
            ignored = %path.display(),
            "config home already resolved; ignoring override"
        );
    }
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() { path } else { base.join(path) }
}
