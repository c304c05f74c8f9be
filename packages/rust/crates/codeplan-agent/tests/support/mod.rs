//! Shared fakes for agent integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use axum::Router;
use codeplan_agent::{
    PlanRequest, PlanSource, PlanStream, RepositoryClient, RepositoryError, RepositorySummary, TreeUpdate,
};
use codeplan_memory::KeyValueStore;
use codeplan_types::FileSet;
use futures::StreamExt;
use tokio::sync::Mutex;

/// What a scripted plan source saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub instruction: String,
    pub selected: Vec<String>,
    pub model: Option<String>,
    pub file_count: usize,
}

/// Plan source that replays canned replies in order.
#[derive(Default)]
pub struct ScriptedPlanSource {
    replies: Mutex<VecDeque<Result<Vec<String>, String>>>,
    pub requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedPlanSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply streamed as the given fragments.
    pub async fn reply(&self, fragments: &[&str]) {
        self.replies
            .lock()
            .await
            .push_back(Ok(fragments.iter().map(|f| (*f).to_string()).collect()));
    }

    /// Queue a transport failure.
    pub async fn fail(&self, message: &str) {
        self.replies.lock().await.push_back(Err(message.to_string()));
    }
}

#[async_trait]
impl PlanSource for ScriptedPlanSource {
    async fn stream_plan(&self, request: PlanRequest<'_>) -> Result<PlanStream> {
        self.requests.lock().await.push(RecordedRequest {
            instruction: request.instruction.to_string(),
            selected: request.selected.to_vec(),
            model: request.model.map(str::to_string),
            file_count: request.files.len(),
        });
        match self.replies.lock().await.pop_front() {
            Some(Ok(fragments)) => Ok(futures::stream::iter(fragments.into_iter().map(Ok)).boxed()),
            Some(Err(message)) => Err(anyhow!(message)),
            None => bail!("no scripted reply left"),
        }
    }
}

/// Repository double that records commits.
#[derive(Default)]
pub struct RecordingRepository {
    pub commits: Mutex<Vec<(String, String, TreeUpdate, String)>>,
    pub reject_commits: bool,
}

#[async_trait]
impl RepositoryClient for RecordingRepository {
    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepositorySummary>, RepositoryError> {
        Ok(vec![RepositorySummary {
            name: "site".to_string(),
            full_name: format!("{owner}/site"),
            default_branch: "main".to_string(),
            private: false,
            html_url: String::new(),
        }])
    }

    async fn fetch_contents(&self, _owner: &str, _repo: &str) -> Result<FileSet, RepositoryError> {
        Ok(FileSet::new())
    }

    async fn commit(
        &self,
        owner: &str,
        repo: &str,
        update: &TreeUpdate,
        message: &str,
    ) -> Result<String, RepositoryError> {
        if self.reject_commits {
            return Err(RepositoryError::Api {
                status: 409,
                path: format!("/repos/{owner}/{repo}/git/refs/heads/main"),
                message: "Update is not a fast forward".to_string(),
            });
        }
        let mut commits = self.commits.lock().await;
        commits.push((owner.to_string(), repo.to_string(), update.clone(), message.to_string()));
        Ok(format!("https://github.com/{owner}/{repo}/commit/{}", commits.len()))
    }
}

/// Key/value store whose writes always fail.
pub struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn backend_name(&self) -> &'static str {
        "read-only"
    }

    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        bail!("storage full writing {key}")
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Serve `app` on an ephemeral local port. `None` when the sandbox forbids binding.
pub async fn spawn_test_server(app: Router) -> Result<Option<(String, tokio::task::JoinHandle<()>)>> {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
            eprintln!("skipping: local sockets are not permitted here");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    wait_for_listener(addr).await;

    Ok(Some((format!("http://{addr}"), handle)))
}

async fn wait_for_listener(addr: std::net::SocketAddr) {
    for _ in 0..20 {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}
