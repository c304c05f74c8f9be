//! `EditSession`: the working file set plus everything that can change it.
//!
//! Generation never touches the working set. A successful generation stages
//! the engine result; only `approve` swaps it in. The pre-change snapshot is
//! pushed to the undo stack before the plan is fetched and popped again when
//! the attempt fails or proposes nothing.

use std::sync::Arc;

use codeplan_edit::{Diagnostic, FileChange, PatchEngine, PatchOutcome, parse_edit_plan, preview_changes};
use codeplan_memory::VersionStore;
use codeplan_tree::{TreeNode, build_tree};
use codeplan_types::{EditPlan, FileSet, PlanSummary, Version};
use codeplan_window::SessionHistory;

use super::error::SessionError;
use crate::github::{RepositoryClient, TreeUpdate};
use crate::llm::{PlanRequest, PlanSource, collect_plan_text};

const COMMIT_MESSAGE_PREFIX: &str = "codeplan: ";
const COMMIT_SUBJECT_MAX_CHARS: usize = 72;

/// Where approved changes go.
#[derive(Clone)]
pub enum SessionTarget {
    /// In-memory project; approvals are recorded in the version store.
    Local,
    /// GitHub repository; approvals become commits on the default branch.
    GitHub {
        /// Repository host client.
        client: Arc<dyn RepositoryClient>,
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },
}

impl std::fmt::Debug for SessionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => f.write_str("Local"),
            Self::GitHub { owner, repo, .. } => f
                .debug_struct("GitHub")
                .field("owner", owner)
                .field("repo", repo)
                .finish_non_exhaustive(),
        }
    }
}

impl SessionTarget {
    fn is_remote(&self) -> bool {
        matches!(self, Self::GitHub { .. })
    }
}

/// A generated change waiting for approve/reject.
#[derive(Debug, Clone)]
pub struct StagedChange {
    /// What the user asked for.
    pub instruction: String,
    /// Parsed plan.
    pub plan: EditPlan,
    /// Engine result; `outcome.files` is the proposed file set.
    pub outcome: PatchOutcome,
    /// File-level diff against the working set.
    pub preview: Vec<FileChange>,
    snapshot_pushed: bool,
}

impl StagedChange {
    /// Commit message derived from the instruction.
    #[must_use]
    pub fn commit_message(&self) -> String {
        let subject: String = self
            .instruction
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .chars()
            .take(COMMIT_SUBJECT_MAX_CHARS)
            .collect();
        format!("{COMMIT_MESSAGE_PREFIX}{subject}")
    }
}

/// Result of `generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// A change is staged.
    Staged {
        /// Operation counts of the plan.
        summary: PlanSummary,
        /// Operations that took effect.
        applied: usize,
        /// Operations that were skipped.
        skipped: usize,
    },
    /// The plan proposed nothing that would change the files.
    NoChanges {
        /// Why operations were skipped, if the plan had any.
        diagnostics: Vec<Diagnostic>,
    },
}

/// Whether approving recorded a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRecord {
    /// Prior file set saved under this number.
    Saved(u64),
    /// Save failed; the approval still went through.
    NotRecorded(String),
}

/// Result of `approve`.
#[derive(Debug, Clone)]
pub enum ApproveOutcome {
    /// Local project: staged set is now the working set.
    Applied {
        /// Working set before the swap.
        previous: FileSet,
        /// Version bookkeeping result.
        version: VersionRecord,
    },
    /// GitHub project: staged set committed and swapped in.
    Committed {
        /// Working set before the swap.
        previous: FileSet,
        /// Commit URL.
        commit_url: String,
    },
}

impl ApproveOutcome {
    /// Working set before the approval.
    #[must_use]
    pub fn previous(&self) -> &FileSet {
        match self {
            Self::Applied { previous, .. } | Self::Committed { previous, .. } => previous,
        }
    }
}

/// One user's editing session over one project.
pub struct EditSession {
    files: FileSet,
    staged: Option<StagedChange>,
    history: SessionHistory,
    versions: VersionStore,
    plan_source: Arc<dyn PlanSource>,
    target: SessionTarget,
    model: Option<String>,
}

impl EditSession {
    /// Create a session over `files`.
    #[must_use]
    pub fn new(
        files: FileSet,
        plan_source: Arc<dyn PlanSource>,
        versions: VersionStore,
        target: SessionTarget,
    ) -> Self {
        Self {
            files,
            staged: None,
            history: SessionHistory::default(),
            versions,
            plan_source,
            target,
            model: None,
        }
    }

    /// Replace the undo stack (e.g. with a configured depth).
    #[must_use]
    pub fn with_history(mut self, history: SessionHistory) -> Self {
        self.history = history;
        self
    }

    /// Model override passed to the plan source.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Current working set.
    #[must_use]
    pub fn files(&self) -> &FileSet {
        &self.files
    }

    /// Pending change, if any.
    #[must_use]
    pub fn staged(&self) -> Option<&StagedChange> {
        self.staged.as_ref()
    }

    /// Approval target.
    #[must_use]
    pub fn target(&self) -> &SessionTarget {
        &self.target
    }

    /// Number of undo steps available.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Display tree of the working set.
    #[must_use]
    pub fn tree(&self) -> Vec<TreeNode> {
        build_tree(&self.files)
    }

    /// Ask the plan source for a plan and stage the result.
    ///
    /// `selected` limits the files sent as context; empty means all files.
    ///
    /// # Errors
    /// `PendingApproval` while a change is staged; `Generation` or `InvalidPlan`
    /// when no usable plan arrives. The working set is untouched either way.
    pub async fn generate(
        &mut self,
        instruction: &str,
        selected: &[String],
    ) -> Result<GenerationOutcome, SessionError> {
        if self.staged.is_some() {
            return Err(SessionError::PendingApproval);
        }

        let snapshot_pushed = self.push_snapshot();
        let plan = match self.acquire_plan(instruction, selected).await {
            Ok(plan) => plan,
            Err(error) => {
                self.rollback_snapshot(snapshot_pushed);
                tracing::warn!(error = %error, "generation failed");
                return Err(error);
            }
        };

        if plan.is_empty() {
            self.rollback_snapshot(snapshot_pushed);
            tracing::info!("model suggested no changes");
            return Ok(GenerationOutcome::NoChanges {
                diagnostics: Vec::new(),
            });
        }

        let outcome = PatchEngine::apply_plan(&self.files, &plan);
        if outcome.changes.is_empty() {
            self.rollback_snapshot(snapshot_pushed);
            tracing::info!(
                skipped = outcome.diagnostics.len(),
                "no plan operation could be applied"
            );
            return Ok(GenerationOutcome::NoChanges {
                diagnostics: outcome.diagnostics,
            });
        }

        let summary = plan.summary();
        let applied = outcome.changes.len();
        let skipped = outcome.diagnostics.iter().filter(|d| d.reason.is_skip()).count();
        let preview = preview_changes(&self.files, &outcome.files);
        tracing::info!(applied, skipped, files = preview.len(), "change staged");

        self.staged = Some(StagedChange {
            instruction: instruction.to_string(),
            plan,
            outcome,
            preview,
            snapshot_pushed,
        });
        Ok(GenerationOutcome::Staged {
            summary,
            applied,
            skipped,
        })
    }

    async fn acquire_plan(
        &self,
        instruction: &str,
        selected: &[String],
    ) -> Result<EditPlan, SessionError> {
        let request = PlanRequest {
            files: &self.files,
            selected,
            instruction,
            model: self.model.as_deref(),
        };
        let stream = self
            .plan_source
            .stream_plan(request)
            .await
            .map_err(SessionError::Generation)?;
        let text = collect_plan_text(stream)
            .await
            .map_err(SessionError::Generation)?;
        Ok(parse_edit_plan(&text)?)
    }

    /// Accept the staged change.
    ///
    /// Local: the prior working set is saved as a version (a failed save is
    /// reported in the outcome, not as an error), then the staged set is swapped
    /// in. GitHub: the staged set is committed first and swapped in only when
    /// the commit succeeds.
    ///
    /// # Errors
    /// `NothingStaged`, or `Commit` when the remote rejects the change (the
    /// change stays staged).
    pub async fn approve(&mut self) -> Result<ApproveOutcome, SessionError> {
        let Some(staged) = self.staged.take() else {
            return Err(SessionError::NothingStaged);
        };

        match &self.target {
            SessionTarget::Local => {
                let version = match self.versions.save(&self.files) {
                    Ok(number) => VersionRecord::Saved(number),
                    Err(error) => {
                        tracing::warn!(error = %error, "history not recorded");
                        VersionRecord::NotRecorded(error.to_string())
                    }
                };
                let previous = std::mem::replace(&mut self.files, staged.outcome.files);
                Ok(ApproveOutcome::Applied { previous, version })
            }
            SessionTarget::GitHub {
                client,
                owner,
                repo,
            } => {
                let message = staged.commit_message();
                let update = TreeUpdate::between(&self.files, &staged.outcome.files);
                match client.commit(owner, repo, &update, &message).await {
                    Ok(commit_url) => {
                        let previous = std::mem::replace(&mut self.files, staged.outcome.files);
                        Ok(ApproveOutcome::Committed {
                            previous,
                            commit_url,
                        })
                    }
                    Err(error) => {
                        tracing::warn!(error = %error, owner = %owner, repo = %repo, "commit failed");
                        self.staged = Some(staged);
                        Err(error.into())
                    }
                }
            }
        }
    }

    /// Discard the staged change and its undo entry.
    ///
    /// # Errors
    /// `NothingStaged`.
    pub fn reject(&mut self) -> Result<StagedChange, SessionError> {
        let staged = self.staged.take().ok_or(SessionError::NothingStaged)?;
        self.rollback_snapshot(staged.snapshot_pushed);
        Ok(staged)
    }

    /// Restore the most recent pre-change snapshot. Drops any staged change.
    ///
    /// # Errors
    /// `UndoDisabled` for GitHub projects, `NothingToUndo` when the stack is empty.
    pub fn undo(&mut self) -> Result<&FileSet, SessionError> {
        if self.target.is_remote() {
            return Err(SessionError::UndoDisabled);
        }
        let previous = self.history.pop().ok_or(SessionError::NothingToUndo)?;
        self.staged = None;
        self.files = previous;
        tracing::info!(files = self.files.len(), remaining = self.history.len(), "undo");
        Ok(&self.files)
    }

    /// All recorded versions, ascending.
    ///
    /// # Errors
    /// Backend cannot enumerate keys.
    pub fn versions(&self) -> Result<Vec<Version>, SessionError> {
        Ok(self.versions.list_all()?)
    }

    /// Make version `number` the working set. The current set goes on the undo stack.
    ///
    /// # Errors
    /// `RestoreDisabled` for GitHub projects, `PendingApproval`, `VersionNotFound`,
    /// or a backend read failure.
    pub fn restore_version(&mut self, number: u64) -> Result<&FileSet, SessionError> {
        if self.target.is_remote() {
            return Err(SessionError::RestoreDisabled);
        }
        if self.staged.is_some() {
            return Err(SessionError::PendingApproval);
        }
        let version = self
            .versions
            .get(number)?
            .ok_or(SessionError::VersionNotFound(number))?;
        self.push_snapshot();
        self.files = version.files;
        tracing::info!(version = number, files = self.files.len(), "version restored");
        Ok(&self.files)
    }

    /// Delete every version and reset numbering. Confirmation is the caller's job.
    ///
    /// # Errors
    /// Backend failure.
    pub fn clear_versions(&mut self) -> Result<(), SessionError> {
        Ok(self.versions.clear_all()?)
    }

    fn push_snapshot(&mut self) -> bool {
        if self.target.is_remote() || self.files.is_empty() {
            return false;
        }
        self.history.push(self.files.clone());
        true
    }

    fn rollback_snapshot(&mut self, pushed: bool) {
        if pushed {
            self.history.pop();
        }
    }
}
