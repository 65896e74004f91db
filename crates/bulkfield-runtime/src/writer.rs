use async_trait::async_trait;
use bulkfield_core::{FieldAssignment, ItemId};

use crate::error::WriteError;

/// The external field write API.
#[async_trait]
pub trait FieldWriter: Send + Sync {
    /// Write `assignment` onto the item `item_id`.
    ///
    /// Called exactly once per planned entry; the orchestrator never retries.
    async fn write(&self, item_id: &ItemId, assignment: &FieldAssignment)
        -> Result<(), WriteError>;
}
