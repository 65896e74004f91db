//! CLI command implementations.

pub mod apply;
pub mod preview;
pub mod show;

use anyhow::{Result, bail};
use bulkfield_core::WorkflowConfig;
use bulkfield_runtime::{AssignmentOrchestrator, PickOutcome, SelectionStore};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog::{CatalogPicker, JsonCatalog};

/// Arguments shared by commands that select items and assign a value.
#[derive(Args, Debug, Clone)]
pub struct AssignArgs {
    /// Catalog JSON file.
    #[arg(long)]
    pub catalog: PathBuf,

    /// Id of an item to select. Repeat for several items.
    #[arg(long = "select", required = true)]
    pub select: Vec<String>,

    /// Custom field value. Surrounding whitespace is trimmed when planning.
    #[arg(long)]
    pub value: String,
}

/// A workflow instance wired to a catalog file, with the selection picked
/// and the value entered.
pub(crate) struct Session {
    pub catalog: Arc<JsonCatalog>,
    pub orchestrator: AssignmentOrchestrator,
}

pub(crate) async fn open_session(args: &AssignArgs, config: &WorkflowConfig) -> Result<Session> {
    let catalog = Arc::new(JsonCatalog::load(&args.catalog)?);
    let picker = Arc::new(CatalogPicker::new(catalog.clone(), args.select.clone()));
    let selection = Arc::new(SelectionStore::with_kind(config.picker.item_kind));

    let orchestrator =
        AssignmentOrchestrator::new(selection, picker, catalog.clone(), config.clone());

    if orchestrator.pick().await == PickOutcome::Unchanged {
        bail!("none of the selected ids exist in {}", args.catalog.display());
    }

    orchestrator.set_value(args.value.clone());
    tracing::info!(
        state = %orchestrator.state(),
        "{}",
        orchestrator.selection().assignment_hint()
    );

    Ok(Session {
        catalog,
        orchestrator,
    })
}
