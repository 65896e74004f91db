//! Test doubles for the picker and the field write API.

#![allow(dead_code)]

use async_trait::async_trait;
use bulkfield_core::{FieldAssignment, ItemId, RawItem, WorkflowConfig};
use bulkfield_runtime::{
    AssignmentOrchestrator, FieldWriter, PickerClient, PickerError, PickerRequest,
    PickerResponse, SelectionStore, WriteError,
};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Picker that replays queued responses, then reports cancellation.
#[derive(Default)]
pub struct ScriptedPicker {
    responses: Mutex<VecDeque<Result<PickerResponse, PickerError>>>,
    requests: Mutex<Vec<PickerRequest>>,
}

impl ScriptedPicker {
    pub fn new(responses: Vec<Result<PickerResponse, PickerError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PickerRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PickerClient for ScriptedPicker {
    async fn pick(&self, request: &PickerRequest) -> Result<PickerResponse, PickerError> {
        self.requests.lock().unwrap().push(*request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(PickerResponse::Cancelled))
    }
}

/// Writer with a fixed answer per item id (default: success) that records
/// every call.
#[derive(Default)]
pub struct ScriptedWriter {
    failures: HashMap<ItemId, WriteError>,
    calls: Mutex<Vec<(ItemId, FieldAssignment)>>,
}

impl ScriptedWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, id: &str, error: WriteError) -> Self {
        self.failures.insert(ItemId::new(id), error);
        self
    }

    pub fn calls(&self) -> Vec<(ItemId, FieldAssignment)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(item, _)| item.as_str() == id)
            .count()
    }
}

#[async_trait]
impl FieldWriter for ScriptedWriter {
    async fn write(
        &self,
        item_id: &ItemId,
        assignment: &FieldAssignment,
    ) -> Result<(), WriteError> {
        self.calls
            .lock()
            .unwrap()
            .push((item_id.clone(), assignment.clone()));
        match self.failures.get(item_id) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Writer whose calls block until the test releases permits.
pub struct GatedWriter {
    gate: Semaphore,
    started: AtomicUsize,
}

impl GatedWriter {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            started: AtomicUsize::new(0),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Yield until at least `n` writes have been dispatched.
    pub async fn wait_started(&self, n: usize) {
        while self.started() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl FieldWriter for GatedWriter {
    async fn write(
        &self,
        _item_id: &ItemId,
        _assignment: &FieldAssignment,
    ) -> Result<(), WriteError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| WriteError::Transport(e.to_string()))?;
        permit.forget();
        Ok(())
    }
}

pub fn raw(id: &str, title: &str) -> RawItem {
    serde_json::from_value(json!({ "id": id, "title": title })).unwrap()
}

pub fn orchestrator_with(
    picker: Arc<dyn PickerClient>,
    writer: Arc<dyn FieldWriter>,
    config: WorkflowConfig,
) -> Arc<AssignmentOrchestrator> {
    Arc::new(AssignmentOrchestrator::new(
        Arc::new(SelectionStore::new()),
        picker,
        writer,
        config,
    ))
}

pub fn sequential() -> WorkflowConfig {
    let mut config = WorkflowConfig::default();
    config.commit.max_concurrency = 1;
    config
}
