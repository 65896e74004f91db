//! Error types for the runtime crate.

use thiserror::Error;

use crate::orchestrator::WorkflowState;

/// Structural errors: the caller asked for something the workflow's gating
/// should have prevented.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// A plan was requested while `can_commit` is false.
    #[error("cannot build plan: {0}")]
    Validation(String),

    /// `commit` was called with a plan holding no entries.
    #[error("commit called with an empty plan")]
    EmptyPlan,

    /// `commit` was called while the workflow was not committable.
    #[error("commit not allowed in state {state}")]
    InvalidState { state: WorkflowState },

    /// `commit` was re-entered while another commit was in flight.
    #[error("a commit is already in progress")]
    CommitInProgress,
}

/// Why the field write API refused one item.
///
/// The display form is the reason recorded in `CommitOutcome::Failed`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WriteError {
    #[error("permission_denied")]
    PermissionDenied,

    #[error("not_found")]
    NotFound,

    /// The item already holds the field with a different type.
    #[error("field_type_conflict")]
    FieldTypeConflict,

    /// Refused for a reason the API reported as free text.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The request never got a definite answer.
    #[error("transport: {0}")]
    Transport(String),
}

/// Failure reported by the picker collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PickerError {
    #[error("picker unavailable: {0}")]
    Unavailable(String),

    #[error("picker returned malformed data: {0}")]
    Malformed(String),
}
