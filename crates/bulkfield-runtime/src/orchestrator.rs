use bulkfield_core::{
    CommitOutcome, CommitResult, FieldAssignment, Item, ItemId, Plan, PlanEntry, WorkflowConfig,
};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::WorkflowError;
use crate::picker::{PickerClient, PickerRequest, PickerResponse};
use crate::selection::SelectionStore;
use crate::writer::FieldWriter;

/// Where a workflow instance stands.
///
/// A settled commit is not a separate resting state: once it returns, the
/// instance is back in whichever of `Empty`/`Ready`/`Committable` the current
/// selection and value imply, and the result stays readable through
/// [`AssignmentOrchestrator::last_result`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    /// No items selected.
    Empty,
    /// Items selected, value blank.
    Ready,
    /// Items selected and a non-blank value pending.
    Committable,
    /// A commit is in flight.
    Committing,
}

impl WorkflowState {
    pub fn is_committable(self) -> bool {
        self == WorkflowState::Committable
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowState::Empty => write!(f, "empty"),
            WorkflowState::Ready => write!(f, "ready"),
            WorkflowState::Committable => write!(f, "committable"),
            WorkflowState::Committing => write!(f, "committing"),
        }
    }
}

/// Result of one picker round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// The selection was replaced and now holds `count` items.
    Replaced { count: usize },
    /// The picker was cancelled, failed or returned nothing usable.
    Unchanged,
}

/// Gates readiness and drives the batch write protocol for one operator session.
pub struct AssignmentOrchestrator {
    selection: Arc<SelectionStore>,
    picker: Arc<dyn PickerClient>,
    writer: Arc<dyn FieldWriter>,
    config: WorkflowConfig,
    value: RwLock<String>,
    committing: AtomicBool,
    last_result: RwLock<Option<CommitResult>>,
}

impl AssignmentOrchestrator {
    pub fn new(
        selection: Arc<SelectionStore>,
        picker: Arc<dyn PickerClient>,
        writer: Arc<dyn FieldWriter>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            selection,
            picker,
            writer,
            config,
            value: RwLock::new(String::new()),
            committing: AtomicBool::new(false),
            last_result: RwLock::new(None),
        }
    }

    pub fn selection(&self) -> &Arc<SelectionStore> {
        &self.selection
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Open the picker once and replace the selection with what it returns.
    ///
    /// Cancellation, picker errors and empty results leave the existing
    /// selection untouched.
    pub async fn pick(&self) -> PickOutcome {
        let request = PickerRequest::from(&self.config.picker);

        let records = match self.picker.pick(&request).await {
            Ok(PickerResponse::Selected(records)) => records,
            Ok(PickerResponse::Cancelled) => {
                tracing::debug!("picker cancelled, selection unchanged");
                return PickOutcome::Unchanged;
            }
            Err(e) => {
                tracing::warn!(error = %e, "picker failed, selection unchanged");
                return PickOutcome::Unchanged;
            }
        };

        let received = records.len();
        let mut items: Vec<Item> = records.into_iter().filter_map(Item::from_raw).collect();
        if items.len() < received {
            tracing::warn!(
                dropped = received - items.len(),
                "ignored picker records without an id"
            );
        }

        if !request.allow_multiple && items.len() > 1 {
            tracing::warn!(
                received = items.len(),
                "picker returned several items for a single-item request, keeping the first"
            );
            items.truncate(1);
        }

        if items.is_empty() {
            tracing::debug!("picker returned no items, selection unchanged");
            return PickOutcome::Unchanged;
        }

        self.selection.replace(items);
        let count = self.selection.size();
        tracing::info!(count, kind = %request.item_kind, "selection replaced from picker");
        PickOutcome::Replaced { count }
    }

    /// Store the operator's input verbatim.
    pub fn set_value(&self, raw: impl Into<String>) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = raw.into();
    }

    pub fn value(&self) -> String {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn state(&self) -> WorkflowState {
        if self.committing.load(Ordering::Acquire) {
            WorkflowState::Committing
        } else {
            self.idle_state()
        }
    }

    /// The most recent settled commit, if any.
    pub fn last_result(&self) -> Option<CommitResult> {
        self.last_result
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// True iff `selection` is non-empty and `raw_value` is not blank.
    pub fn can_commit(selection: &[Item], raw_value: &str) -> bool {
        !selection.is_empty() && !raw_value.trim().is_empty()
    }

    /// One write per selected item, all carrying the trimmed value.
    pub fn build_plan(selection: &[Item], raw_value: &str) -> Result<Plan, WorkflowError> {
        if !Self::can_commit(selection, raw_value) {
            let reason = if selection.is_empty() {
                "no items selected"
            } else {
                "value is blank"
            };
            return Err(WorkflowError::Validation(reason.to_string()));
        }

        let value = raw_value.trim();
        Ok(Plan::new(selection.iter().map(|item| {
            PlanEntry::new(item.id.clone(), FieldAssignment::custom_field(value))
        })))
    }

    /// [`Self::build_plan`] over the current selection and pending value.
    pub fn current_plan(&self) -> Result<Plan, WorkflowError> {
        Self::build_plan(&self.selection.current(), &self.value())
    }

    /// Execute `plan`, one write per entry.
    pub async fn commit(&self, plan: Plan) -> Result<CommitResult, WorkflowError> {
        let cancel = CancellationToken::new();
        self.commit_with_cancel(plan, &cancel).await
    }

    /// Execute `plan`, refusing to dispatch further writes once `cancel` fires.
    ///
    /// Writes already dispatched when `cancel` fires run to completion and are
    /// recorded. Entries never dispatched are recorded as `Skipped`, unless
    /// nothing was dispatched at all, in which case the result is empty.
    /// Either way the result is marked cancelled.
    pub async fn commit_with_cancel(
        &self,
        plan: Plan,
        cancel: &CancellationToken,
    ) -> Result<CommitResult, WorkflowError> {
        let _guard = CommitGuard::acquire(&self.committing)?;

        if plan.is_empty() {
            return Err(WorkflowError::EmptyPlan);
        }

        let state = self.idle_state();
        if !state.is_committable() {
            return Err(WorkflowError::InvalidState { state });
        }

        let result = self.dispatch(plan, cancel).await;

        *self
            .last_result
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(result.clone());

        Ok(result)
    }

    fn idle_state(&self) -> WorkflowState {
        let selection = self.selection.current();
        if Self::can_commit(&selection, &self.value()) {
            WorkflowState::Committable
        } else if selection.is_empty() {
            WorkflowState::Empty
        } else {
            WorkflowState::Ready
        }
    }

    async fn dispatch(&self, plan: Plan, cancel: &CancellationToken) -> CommitResult {
        let commit_id = Uuid::new_v4();
        let started_at = Utc::now();
        let limit = self.config.commit.max_concurrency.max(1);
        let total = plan.len();

        tracing::info!(%commit_id, items = total, max_concurrency = limit, "commit started");

        let mut pending = plan.into_entries().into_iter();
        let mut in_flight = FuturesUnordered::new();
        let mut outcomes: BTreeMap<ItemId, CommitOutcome> = BTreeMap::new();
        let mut dispatched = 0usize;

        loop {
            while in_flight.len() < limit && !cancel.is_cancelled() {
                let Some(entry) = pending.next() else { break };
                dispatched += 1;
                in_flight.push(self.write_one(entry));
            }

            match in_flight.next().await {
                Some((item_id, outcome)) => {
                    outcomes.insert(item_id, outcome);
                }
                None => break,
            }
        }

        let undispatched: Vec<PlanEntry> = pending.collect();
        if !undispatched.is_empty() {
            tracing::info!(
                %commit_id,
                dispatched,
                undispatched = undispatched.len(),
                "commit cancelled"
            );
            if dispatched == 0 {
                return CommitResult::cancelled_before_dispatch(commit_id, started_at);
            }
        }

        let cancelled = !undispatched.is_empty();
        for entry in undispatched {
            outcomes.insert(entry.item_id, CommitOutcome::Skipped);
        }

        let result = CommitResult {
            commit_id,
            started_at,
            finished_at: Utc::now(),
            cancelled,
            outcomes,
        };

        let summary = result.summary();
        tracing::info!(
            %commit_id,
            applied = summary.applied,
            failed = summary.failed,
            skipped = summary.skipped,
            "commit settled"
        );

        result
    }

    async fn write_one(&self, entry: PlanEntry) -> (ItemId, CommitOutcome) {
        let PlanEntry {
            item_id,
            assignment,
        } = entry;

        let outcome = match self.writer.write(&item_id, &assignment).await {
            Ok(()) => {
                tracing::debug!(item = %item_id, field = %assignment.qualified_key(), "field written");
                CommitOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(item = %item_id, reason = %e, "field write failed");
                CommitOutcome::failed(e.to_string())
            }
        };

        (item_id, outcome)
    }
}

/// Exclusive in-progress flag, released on drop.
struct CommitGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CommitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, WorkflowError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| WorkflowError::CommitInProgress)?;
        Ok(Self { flag })
    }
}

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
