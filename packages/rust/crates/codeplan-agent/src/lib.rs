//! codeplan-agent - edit sessions driven by model-authored plans.
//!
//! - **config**: YAML settings (system + user merge).
//! - **llm**: `PlanSource` trait and the OpenAI-compatible streaming client.
//! - **github**: `RepositoryClient` trait and the GitHub REST client.
//! - **session**: `EditSession` (generate → stage → approve/reject, undo, versions).

mod config;
mod github;
mod llm;
mod session;

pub use config::{
    DEFAULT_API_KEY_ENV, DEFAULT_GITHUB_API_BASE, DEFAULT_GITHUB_TOKEN_ENV, DEFAULT_LLM_BASE_URL,
    DEFAULT_LLM_MODEL, DEFAULT_LLM_TIMEOUT_SECS, GitHubSettings, HistoryBackend, HistorySettings,
    LlmSettings, RuntimeSettings, load_runtime_settings, load_runtime_settings_from_paths,
    runtime_settings_paths, set_config_home_override,
};
pub use github::{GitHubClient, RepositoryClient, RepositoryError, RepositorySummary, TreeUpdate};
pub use llm::{
    ChatPlanClient, PlanRequest, PlanSource, PlanStream, build_system_prompt, build_user_prompt,
    collect_plan_text,
};
pub use session::{
    ApproveOutcome, EditSession, GenerationOutcome, SessionError, SessionTarget, StagedChange,
    VersionRecord,
};
