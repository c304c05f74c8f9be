//! Plan acquisition: the model collaborator that turns an instruction into
//! edit-plan JSON text.

mod chat;
mod prompt;

use anyhow::Result;
use async_trait::async_trait;
use codeplan_types::FileSet;
use futures::StreamExt;
use futures::stream::BoxStream;

pub use chat::ChatPlanClient;
pub use prompt::{build_system_prompt, build_user_prompt};

/// Text fragments of one plan, in arrival order.
pub type PlanStream = BoxStream<'static, Result<String>>;

/// Everything the model needs for one generation.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    /// Current working files.
    pub files: &'a FileSet,
    /// Files the user selected as context. Empty means all files.
    pub selected: &'a [String],
    /// What the user asked for.
    pub instruction: &'a str,
    /// Model override; `None` uses the source's default.
    pub model: Option<&'a str>,
}

/// Source of edit plans.
#[async_trait]
pub trait PlanSource: Send + Sync {
    /// Start generating a plan for `request`.
    async fn stream_plan(&self, request: PlanRequest<'_>) -> Result<PlanStream>;
}

/// Accumulate a whole plan stream. The first failed fragment aborts.
///
/// # Errors
/// Whatever error the stream yields.
pub async fn collect_plan_text(mut stream: PlanStream) -> Result<String> {
    let mut text = String::new();
    while let Some(fragment) = stream.next().await {
        text.push_str(&fragment?);
    }
    tracing::debug!(chars = text.len(), "plan text received");
    Ok(text)
}
