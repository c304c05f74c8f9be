//! Repository collaborator: list, import, and commit projects on GitHub.
//!
//! Commits are built on top of the head tree: only the records in a
//! [`TreeUpdate`] are written, and only its removals are deleted, so entries the
//! file set never held (submodules, oversized files, file modes) survive. The ref
//! update is the last step; a failure before it leaves the branch untouched.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use codeplan_io::{record_from_bytes, split_data_uri};
use codeplan_types::{FileRecord, FileSet};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("codeplan/", env!("CARGO_PKG_VERSION"));
const PAGE_SIZE: usize = 100;
const BLOB_MODE: &str = "100644";

/// Failures talking to the repository host.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Network or decoding failure.
    #[error("GitHub request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("GitHub API error {status} on {path}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Request path.
        path: String,
        /// Message from the response body.
        message: String,
    },

    /// Recursive tree listing was cut short by the server.
    #[error("repository tree for {0} is truncated; refusing a partial import")]
    Truncated(String),

    /// Blob content could not be decoded.
    #[error("invalid blob for {path}: {reason}")]
    InvalidBlob {
        /// File path in the repository.
        path: String,
        /// What was wrong.
        reason: String,
    },
}

/// One repository in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Default branch.
    #[serde(default)]
    pub default_branch: String,
    /// Private flag.
    #[serde(default)]
    pub private: bool,
    /// Web URL.
    #[serde(default)]
    pub html_url: String,
}

/// Changes to commit on top of the branch head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeUpdate {
    /// Records created or changed, in file set order.
    pub upserts: Vec<FileRecord>,
    /// Names to delete from the branch.
    pub removals: Vec<String>,
}

impl TreeUpdate {
    /// Difference that turns `before` into `after`.
    #[must_use]
    pub fn between(before: &FileSet, after: &FileSet) -> Self {
        let upserts = after
            .iter()
            .filter(|record| before.get(&record.name) != Some(*record))
            .cloned()
            .collect();
        let removals = before
            .iter()
            .filter(|record| !after.contains(&record.name))
            .map(|record| record.name.clone())
            .collect();
        Self { upserts, removals }
    }

    /// Whether nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.removals.is_empty()
    }
}

/// Remote project host.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Repositories owned by `owner`.
    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepositorySummary>, RepositoryError>;

    /// Full file set at the head of the default branch.
    async fn fetch_contents(&self, owner: &str, repo: &str) -> Result<FileSet, RepositoryError>;

    /// Commit `update` on top of the default branch head; returns the commit URL.
    async fn commit(
        &self,
        owner: &str,
        repo: &str,
        update: &TreeUpdate,
        message: &str,
    ) -> Result<String, RepositoryError>;
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(default)]
    mode: String,
    #[serde(rename = "type")]
    kind: String,
    sha: String,
}

#[derive(Debug, Deserialize)]
struct BlobResponse {
    content: String,
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct ShaResponse {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: ShaResponse,
}

#[derive(Debug, Deserialize)]
struct CommitObject {
    tree: ShaResponse,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: String,
    #[serde(default)]
    html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// GitHub REST v3 client.
pub struct GitHubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client for `api_base` (usually `https://api.github.com`).
    ///
    /// # Errors
    /// When the HTTP client cannot be built.
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self, RepositoryError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .client
            .request(method, format!("{}{path}", self.api_base))
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        if let Some(ref token) = self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        path: &str,
    ) -> Result<T, RepositoryError> {
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(text);
            return Err(RepositoryError::Api {
                status: status.as_u16(),
                path: path.to_string(),
                message,
            });
        }
        Ok(res.json::<T>().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RepositoryError> {
        self.send_json(self.request(Method::GET, path), path).await
    }

    async fn default_branch(&self, owner: &str, repo: &str) -> Result<String, RepositoryError> {
        let info: RepoInfo = self.get_json(&format!("/repos/{owner}/{repo}")).await?;
        Ok(info.default_branch)
    }

    async fn create_blob(
        &self,
        owner: &str,
        repo: &str,
        content: &str,
        encoding: &str,
    ) -> Result<String, RepositoryError> {
        let path = format!("/repos/{owner}/{repo}/git/blobs");
        let req = self
            .request(Method::POST, &path)
            .json(&json!({ "content": content, "encoding": encoding }));
        let blob: ShaResponse = self.send_json(req, &path).await?;
        Ok(blob.sha)
    }

    /// File modes of every entry under `tree_sha`, so rewritten files keep
    /// their executable or symlink bit.
    async fn tree_modes(
        &self,
        owner: &str,
        repo: &str,
        tree_sha: &str,
    ) -> Result<HashMap<String, String>, RepositoryError> {
        let tree: TreeResponse = self
            .get_json(&format!("/repos/{owner}/{repo}/git/trees/{tree_sha}?recursive=1"))
            .await?;
        if tree.truncated {
            tracing::warn!(owner, repo, "head tree listing truncated; unlisted files get mode 100644");
        }
        Ok(tree
            .tree
            .into_iter()
            .filter(|entry| !entry.mode.is_empty())
            .map(|entry| (entry.path, entry.mode))
            .collect())
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepositorySummary>, RepositoryError> {
        let mut repos = Vec::new();
        for page in 1.. {
            let path = format!("/users/{owner}/repos?per_page={PAGE_SIZE}&page={page}");
            let batch: Vec<RepositorySummary> = self.get_json(&path).await?;
            let last = batch.len() < PAGE_SIZE;
            repos.extend(batch);
            if last {
                break;
            }
        }
        tracing::debug!(owner, count = repos.len(), "listed repositories");
        Ok(repos)
    }

    async fn fetch_contents(&self, owner: &str, repo: &str) -> Result<FileSet, RepositoryError> {
        let branch = self.default_branch(owner, repo).await?;
        let tree: TreeResponse = self
            .get_json(&format!("/repos/{owner}/{repo}/git/trees/{branch}?recursive=1"))
            .await?;
        if tree.truncated {
            return Err(RepositoryError::Truncated(format!("{owner}/{repo}")));
        }

        let mut files = FileSet::new();
        for entry in tree.tree.into_iter().filter(|e| e.kind == "blob") {
            let blob: BlobResponse = self
                .get_json(&format!("/repos/{owner}/{repo}/git/blobs/{}", entry.sha))
                .await?;
            let bytes = decode_blob(&entry.path, &blob)?;
            files.insert(record_from_bytes(entry.path, bytes));
        }
        tracing::info!(owner, repo, branch = %branch, files = files.len(), "fetched repository");
        Ok(files)
    }

    async fn commit(
        &self,
        owner: &str,
        repo: &str,
        update: &TreeUpdate,
        message: &str,
    ) -> Result<String, RepositoryError> {
        let payloads = update
            .upserts
            .iter()
            .map(blob_payload)
            .collect::<Result<Vec<_>, _>>()?;

        let branch = self.default_branch(owner, repo).await?;
        let head: RefResponse = self
            .get_json(&format!("/repos/{owner}/{repo}/git/ref/heads/{branch}"))
            .await?;
        let head_commit: CommitObject = self
            .get_json(&format!("/repos/{owner}/{repo}/git/commits/{}", head.object.sha))
            .await?;
        let base_tree = head_commit.tree.sha;
        let modes = self.tree_modes(owner, repo, &base_tree).await?;
        let mode_of = |name: &str| modes.get(name).map_or(BLOB_MODE, String::as_str).to_string();

        let mut entries = Vec::with_capacity(payloads.len() + update.removals.len());
        for (record, (content, encoding)) in update.upserts.iter().zip(payloads) {
            let sha = self.create_blob(owner, repo, content, encoding).await?;
            entries.push(json!({
                "path": record.name,
                "mode": mode_of(&record.name),
                "type": "blob",
                "sha": sha,
            }));
        }
        for name in &update.removals {
            entries.push(json!({
                "path": name,
                "mode": mode_of(name),
                "type": "blob",
                "sha": serde_json::Value::Null,
            }));
        }

        let trees_path = format!("/repos/{owner}/{repo}/git/trees");
        let tree: ShaResponse = self
            .send_json(
                self.request(Method::POST, &trees_path)
                    .json(&json!({ "base_tree": base_tree, "tree": entries })),
                &trees_path,
            )
            .await?;

        let commits_path = format!("/repos/{owner}/{repo}/git/commits");
        let commit: CommitResponse = self
            .send_json(
                self.request(Method::POST, &commits_path).json(&json!({
                    "message": message,
                    "tree": tree.sha,
                    "parents": [head.object.sha],
                })),
                &commits_path,
            )
            .await?;

        let ref_path = format!("/repos/{owner}/{repo}/git/refs/heads/{branch}");
        let _: serde_json::Value = self
            .send_json(
                self.request(Method::PATCH, &ref_path)
                    .json(&json!({ "sha": commit.sha, "force": false })),
                &ref_path,
            )
            .await?;

        let url = commit
            .html_url
            .unwrap_or_else(|| format!("https://github.com/{owner}/{repo}/commit/{}", commit.sha));
        tracing::info!(
            owner,
            repo,
            branch = %branch,
            written = update.upserts.len(),
            removed = update.removals.len(),
            url = %url,
            "committed tree update"
        );
        Ok(url)
    }
}

/// Blob body for a record: the data URI payload as base64 for binaries, raw text otherwise.
fn blob_payload(record: &FileRecord) -> Result<(&str, &'static str), RepositoryError> {
    if !record.is_binary() {
        return Ok((record.content.as_str(), "utf-8"));
    }
    let (_, payload) = split_data_uri(&record.content).ok_or_else(|| RepositoryError::InvalidBlob {
        path: record.name.clone(),
        reason: "binary record is not a base64 data URI".to_string(),
    })?;
    Ok((payload, "base64"))
}

fn decode_blob(path: &str, blob: &BlobResponse) -> Result<Vec<u8>, RepositoryError> {
    match blob.encoding.as_str() {
        "base64" => {
            let compact: String = blob.content.split_whitespace().collect();
            STANDARD
                .decode(compact)
                .map_err(|e| RepositoryError::InvalidBlob {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
        }
        "utf-8" | "utf8" => Ok(blob.content.clone().into_bytes()),
        other => Err(RepositoryError::InvalidBlob {
            path: path.to_string(),
            reason: format!("unsupported encoding {other}"),
        }),
    }
}
