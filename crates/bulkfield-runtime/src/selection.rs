//! The authoritative current selection.

use bulkfield_core::{Item, ItemKind, dedup_last_wins};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Holds the operator's current selection.
///
/// The selection is only ever replaced or cleared as a whole. Reads return
/// copies, so callers cannot reach the stored items.
#[derive(Debug, Default)]
pub struct SelectionStore {
    kind: ItemKind,
    items: RwLock<Vec<Item>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose labels talk about `kind` items.
    pub fn with_kind(kind: ItemKind) -> Self {
        Self {
            kind,
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Replace the whole selection.
    ///
    /// Duplicate ids collapse to their last occurrence, kept at the position
    /// where the id first appeared.
    pub fn replace(&self, items: impl IntoIterator<Item = Item>) {
        let deduped = dedup_last_wins(items, |item| item.id.clone());
        let count = deduped.len();
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = deduped;
        tracing::debug!(count, "selection replaced");
    }

    pub fn clear(&self) {
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        tracing::debug!("selection cleared");
    }

    pub fn current(&self) -> Vec<Item> {
        self.read().clone()
    }

    pub fn size(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Label for the button that opens the picker.
    pub fn picker_label(&self) -> String {
        if self.is_empty() {
            format!("Select {}", self.kind.title_plural())
        } else {
            "Change Selection".to_string()
        }
    }

    /// Help text shown under the value input.
    pub fn assignment_hint(&self) -> String {
        match self.size() {
            0 => format!("Select {} first", self.kind.noun(0)),
            n => format!("This value will be saved to {} {}", n, self.kind.noun(n)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Item>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }
}
