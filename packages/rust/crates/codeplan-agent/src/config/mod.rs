//! Runtime configuration.

mod settings;

pub use settings::{
    DEFAULT_API_KEY_ENV, DEFAULT_GITHUB_API_BASE, DEFAULT_GITHUB_TOKEN_ENV, DEFAULT_LLM_BASE_URL,
    DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_SECS, GitHubSettings, HistoryBackend, HistorySettings,
    LlmSettings, RuntimeSettings, load_runtime_settings, load_runtime_settings_from_paths,
    runtime_settings_paths, set_config_home_override,
};
