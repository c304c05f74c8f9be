//! Session history: bounded stack of `FileSet` snapshots.

use std::collections::VecDeque;

use codeplan_types::FileSet;

/// Default number of undo steps kept per session.
pub const DEFAULT_HISTORY_DEPTH: usize = 10;

/// Bounded undo stack. O(1) push/pop, drops the oldest snapshot when over capacity.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    ring: VecDeque<FileSet>,
    max_depth: usize,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl SessionHistory {
    /// Create a history holding at most `max_depth` snapshots (minimum 1).
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            ring: VecDeque::with_capacity(max_depth.min(64)),
            max_depth,
        }
    }

    /// Push a snapshot as the most recent entry. Evicts the oldest past capacity.
    pub fn push(&mut self, files: FileSet) {
        self.ring.push_front(files);
        while self.ring.len() > self.max_depth {
            if self.ring.pop_back().is_none() {
                break;
            }
            tracing::debug!(max_depth = self.max_depth, "oldest undo snapshot evicted");
        }
    }

    /// Remove and return the most recent snapshot. `None` means undo is unavailable.
    pub fn pop(&mut self) -> Option<FileSet> {
        self.ring.pop_front()
    }

    /// Most recent snapshot without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<&FileSet> {
        self.ring.front()
    }

    /// Number of snapshots held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Whether undo is unavailable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Capacity.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.ring.clear();
    }
}
