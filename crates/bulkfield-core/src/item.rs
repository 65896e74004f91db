//! Catalog items as delivered by the item picker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, globally unique identity of a catalog item (e.g. `gid://shop/Product/1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `/`-separated segment of the id, used for compact display.
    pub fn short(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of catalog entity the picker is asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Product,
    Variant,
    Collection,
}

impl ItemKind {
    /// Lowercase noun, pluralized for `count != 1`.
    pub fn noun(self, count: usize) -> &'static str {
        match (self, count == 1) {
            (ItemKind::Product, true) => "product",
            (ItemKind::Product, false) => "products",
            (ItemKind::Variant, true) => "variant",
            (ItemKind::Variant, false) => "variants",
            (ItemKind::Collection, true) => "collection",
            (ItemKind::Collection, false) => "collections",
        }
    }

    /// Capitalized plural noun for button labels.
    pub fn title_plural(self) -> &'static str {
        match self {
            ItemKind::Product => "Products",
            ItemKind::Variant => "Variants",
            ItemKind::Collection => "Collections",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun(1))
    }
}

/// An immutable snapshot of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    /// Opaque passthrough from the picker; never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<serde_json::Value>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            handle: None,
            variants: None,
        }
    }

    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    pub fn short_id(&self) -> &str {
        self.id.short()
    }

    /// Map a raw picker record into an item.
    ///
    /// String and numeric ids are accepted; records without a usable id
    /// return `None`.
    pub fn from_raw(raw: RawItem) -> Option<Self> {
        let id = match raw.id {
            serde_json::Value::String(s) if !s.is_empty() => s,
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };

        Some(Self {
            id: ItemId(id),
            title: raw.title,
            handle: raw.handle,
            variants: raw.variants,
        })
    }
}

/// A record exactly as returned by the picker collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
    #[serde(default)]
    pub variants: Option<serde_json::Value>,
}
