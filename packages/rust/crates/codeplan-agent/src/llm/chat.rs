//! OpenAI-compatible streaming chat completions as a plan source.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use futures::future::ready;
use serde::{Deserialize, Serialize};

use super::prompt::{build_system_prompt, build_user_prompt};
use super::{PlanRequest, PlanSource, PlanStream};
use crate::config::LlmSettings;

const DONE_MARKER: &str = "[DONE]";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// One `data:` payload of the stream.
#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ChunkError>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkError {
    #[serde(default)]
    message: String,
}

/// HTTP client for `chat/completions` with `stream: true`.
pub struct ChatPlanClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl ChatPlanClient {
    /// Create a client for `base_url` (the `/chat/completions` suffix is added).
    ///
    /// # Errors
    /// When the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build model HTTP client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            model: model.into(),
            api_key,
        })
    }

    /// Create a client from the `llm:` settings section.
    ///
    /// # Errors
    /// When the HTTP client cannot be built.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self> {
        Self::new(
            settings.base_url(),
            settings.model(),
            settings.api_key(),
            Duration::from_secs(settings.timeout_secs()),
        )
    }

    /// Full completions URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlanSource for ChatPlanClient {
    async fn stream_plan(&self, request: PlanRequest<'_>) -> Result<PlanStream> {
        let model = request.model.unwrap_or(&self.model);
        let body = ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: build_system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(&request),
                },
            ],
            stream: true,
        };

        let mut req = self.client.post(&self.endpoint).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        tracing::info!(endpoint = %self.endpoint, model, "requesting edit plan");
        let res = req.send().await.context("model request failed")?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("LLM API error {status}: {text}"));
        }

        let stream = res
            .bytes_stream()
            .eventsource()
            .take_while(|event| {
                ready(!matches!(event, Ok(event) if event.data.trim() == DONE_MARKER))
            })
            .filter_map(|event| {
                ready(match event {
                    Ok(event) => decode_chunk(&event.data).transpose(),
                    Err(error) => Some(Err(anyhow!("model stream interrupted: {error}"))),
                })
            })
            .boxed();
        Ok(stream)
    }
}

/// Text carried by one SSE data payload, if any.
fn decode_chunk(data: &str) -> Result<Option<String>> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(None);
    }
    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| anyhow!("LLM stream parse error: {e}; chunk: {data}"))?;
    if let Some(error) = chunk.error {
        return Err(anyhow!("LLM stream error: {}", error.message));
    }
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}
