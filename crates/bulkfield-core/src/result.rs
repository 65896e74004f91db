//! Per-item outcomes of a commit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

use crate::item::ItemId;

/// Outcome of one planned write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommitOutcome {
    /// The write API accepted the field.
    Applied,
    /// The write API refused the field; `reason` is passed through untouched.
    Failed { reason: String },
    /// The write was never dispatched (commit cancelled first).
    Skipped,
}

impl CommitOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        CommitOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, CommitOutcome::Applied)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CommitOutcome::Failed { .. })
    }
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitOutcome::Applied => write!(f, "applied"),
            CommitOutcome::Failed { reason } => write!(f, "failed ({})", reason),
            CommitOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// The mapping from item id to outcome produced by one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub commit_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Set when the caller cancelled and at least one planned write was not dispatched.
    pub cancelled: bool,
    pub outcomes: BTreeMap<ItemId, CommitOutcome>,
}

impl CommitResult {
    /// A settled, uncancelled result stamped now.
    pub fn from_outcomes(outcomes: BTreeMap<ItemId, CommitOutcome>) -> Self {
        let now = Utc::now();
        Self {
            commit_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            cancelled: false,
            outcomes,
        }
    }

    /// The result of a commit cancelled before any write was dispatched.
    pub fn cancelled_before_dispatch(commit_id: Uuid, started_at: DateTime<Utc>) -> Self {
        Self {
            commit_id,
            started_at,
            finished_at: Utc::now(),
            cancelled: true,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn get(&self, item_id: &ItemId) -> Option<&CommitOutcome> {
        self.outcomes.get(item_id)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn failed_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.outcomes
            .iter()
            .filter(|(_, o)| o.is_failed())
            .map(|(id, _)| id)
    }

    pub fn summary(&self) -> CommitSummary {
        let mut summary = CommitSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in self.outcomes.values() {
            match outcome {
                CommitOutcome::Applied => summary.applied += 1,
                CommitOutcome::Failed { .. } => summary.failed += 1,
                CommitOutcome::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// Every planned write applied and nothing was cancelled.
    pub fn is_complete_success(&self) -> bool {
        !self.cancelled && self.outcomes.values().all(CommitOutcome::is_applied)
    }

    /// Fold a follow-up commit (typically a retry) into this result.
    ///
    /// Outcomes in `retry` replace the ones recorded here for the same ids.
    pub fn merge(&mut self, retry: CommitResult) {
        self.finished_at = retry.finished_at;
        self.cancelled = retry.cancelled;
        self.outcomes.extend(retry.outcomes);
    }
}

/// Outcome counts for rendering "7 of 10 applied".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub total: usize,
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl fmt::Display for CommitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} applied", self.applied, self.total)?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}
