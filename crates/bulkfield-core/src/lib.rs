//! # bulkfield-core
//!
//! Shared types for the bulk field-assignment workflow.
//!
//! - [`Item`] / [`ItemId`]: catalog entities as delivered by the picker
//! - [`FieldAssignment`]: the namespaced field written onto every selected item
//! - [`Plan`]: the validated list of per-item writes
//! - [`CommitResult`]: the per-item outcome mapping of one commit
//! - [`WorkflowConfig`]: YAML configuration for picker and commit behaviour

pub mod config;
pub mod dedup;
pub mod error;
pub mod field;
pub mod item;
pub mod plan;
pub mod result;

pub use config::{CommitConfig, PickerConfig, WorkflowConfig};
pub use dedup::dedup_last_wins;
pub use error::ConfigError;
pub use field::{FIELD_KEY, FIELD_NAMESPACE, FIELD_TYPE, FieldAssignment};
pub use item::{Item, ItemId, ItemKind, RawItem};
pub use plan::{Plan, PlanEntry, PlanPreview, PreviewLine};
pub use result::{CommitOutcome, CommitResult, CommitSummary};
