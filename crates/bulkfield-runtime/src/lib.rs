//! # bulkfield-runtime
//!
//! The bulk field-assignment workflow:
//!
//! 1. [`AssignmentOrchestrator::pick`] asks the [`PickerClient`] for items and
//!    replaces the [`SelectionStore`] contents on a non-empty result.
//! 2. The operator's raw input is stored with [`AssignmentOrchestrator::set_value`].
//! 3. [`AssignmentOrchestrator::can_commit`] gates the commit button.
//! 4. [`AssignmentOrchestrator::build_plan`] materializes one write per item.
//! 5. [`AssignmentOrchestrator::commit`] dispatches the writes through the
//!    [`FieldWriter`] and returns a per-item [`CommitResult`].
//!
//! Per-item write failures are data in the result, never errors. Only
//! structural misuse surfaces as a [`WorkflowError`].
//!
//! [`CommitResult`]: bulkfield_core::CommitResult

pub mod error;
pub mod orchestrator;
pub mod picker;
pub mod selection;
pub mod writer;

pub use error::{PickerError, WorkflowError, WriteError};
pub use orchestrator::{AssignmentOrchestrator, PickOutcome, WorkflowState};
pub use picker::{PickerClient, PickerRequest, PickerResponse};
pub use selection::SelectionStore;
pub use tokio_util::sync::CancellationToken;
pub use writer::FieldWriter;
