//! Tests for ChatPlanClient against a local SSE endpoint.

#![allow(missing_docs)]

mod support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use codeplan_agent::{ChatPlanClient, PlanRequest, PlanSource, collect_plan_text};
use codeplan_types::{FileRecord, FileSet};
use serde_json::Value;
use tokio::sync::Mutex;

use support::spawn_test_server;

#[derive(Clone, Default)]
struct Captured {
    body: Arc<Mutex<Option<Value>>>,
    auth: Arc<Mutex<Option<String>>>,
}

const SSE_BODY: &str = "\
data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"{\\\"deleteFiles\\\":\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"[\\\"old.txt\\\"]}\"}}]}\n\n\
data: [DONE]\n\n";

async fn completions(
    State(captured): State<Captured>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    *captured.body.lock().await = serde_json::from_str(&body).ok();
    *captured.auth.lock().await = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ([(header::CONTENT_TYPE, "text/event-stream")], SSE_BODY)
}

async fn overloaded() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "overloaded")
}

fn files() -> FileSet {
    FileSet::from_records([FileRecord::new("old.txt", "bye", "text/plain")])
}

#[tokio::test]
async fn test_streamed_fragments_join_into_plan() -> Result<()> {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(captured.clone());
    let Some((base_url, _server)) = spawn_test_server(app).await? else {
        return Ok(());
    };
    let client = ChatPlanClient::new(
        &format!("{base_url}/v1"),
        "default-model",
        Some("sk-test".to_string()),
        Duration::from_secs(5),
    )?;
    let files = files();

    let stream = client
        .stream_plan(PlanRequest {
            files: &files,
            selected: &[],
            instruction: "remove old.txt",
            model: Some("other-model"),
        })
        .await?;
    let text = collect_plan_text(stream).await?;

    assert_eq!(text, r#"{"deleteFiles":["old.txt"]}"#);
    let body = captured.body.lock().await.clone().unwrap_or_default();
    assert_eq!(body["model"], "other-model");
    assert_eq!(body["stream"], true);
    assert_eq!(body["messages"][0]["role"], "system");
    let user_prompt = body["messages"][1]["content"].as_str().unwrap_or_default();
    assert!(user_prompt.contains("remove old.txt"));
    assert!(user_prompt.contains("--- old.txt (text/plain)"));
    assert_eq!(captured.auth.lock().await.as_deref(), Some("Bearer sk-test"));
    Ok(())
}

#[tokio::test]
async fn test_error_status_is_surfaced() -> Result<()> {
    let app = Router::new().route("/chat/completions", post(overloaded));
    let Some((base_url, _server)) = spawn_test_server(app).await? else {
        return Ok(());
    };
    let client = ChatPlanClient::new(&base_url, "m", None, Duration::from_secs(5))?;
    let files = files();

    let result = client
        .stream_plan(PlanRequest {
            files: &files,
            selected: &[],
            instruction: "x",
            model: None,
        })
        .await;

    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert!(message.contains("503"));
    assert!(message.contains("overloaded"));
    Ok(())
}
