use async_trait::async_trait;
use bulkfield_core::{ItemKind, PickerConfig, RawItem};
use serde::{Deserialize, Serialize};

use crate::error::PickerError;

/// What the picker is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerRequest {
    pub item_kind: ItemKind,
    pub allow_multiple: bool,
}

impl From<&PickerConfig> for PickerRequest {
    fn from(config: &PickerConfig) -> Self {
        Self {
            item_kind: config.item_kind,
            allow_multiple: config.allow_multiple,
        }
    }
}

/// One resolved picker interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerResponse {
    Selected(Vec<RawItem>),
    Cancelled,
}

/// The external item picker.
///
/// Each call is a single suspension point resolving to one response.
#[async_trait]
pub trait PickerClient: Send + Sync {
    async fn pick(&self, request: &PickerRequest) -> Result<PickerResponse, PickerError>;
}
