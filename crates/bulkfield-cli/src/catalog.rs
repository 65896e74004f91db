//! JSON file-backed catalog.
//!
//! Stands in for the hosting platform: [`CatalogPicker`] plays the item
//! picker and [`JsonCatalog`] plays the field write API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use bulkfield_core::{FieldAssignment, ItemId, RawItem};
use bulkfield_runtime::{
    FieldWriter, PickerClient, PickerError, PickerRequest, PickerResponse, WriteError,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// On-disk catalog layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub items: Vec<CatalogEntry>,
}

/// One catalog item and the custom fields stored on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<serde_json::Value>,
    /// Writes to this item are refused with `permission_denied`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    #[serde(default)]
    pub fields: Vec<FieldAssignment>,
}

impl CatalogEntry {
    fn to_raw(&self) -> RawItem {
        RawItem {
            id: serde_json::Value::String(self.id.clone()),
            title: self.title.clone(),
            handle: self.handle.clone(),
            variants: self.variants.clone(),
        }
    }
}

pub struct JsonCatalog {
    path: PathBuf,
    file: Mutex<CatalogFile>,
}

impl JsonCatalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let file: CatalogFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;

        tracing::debug!(path = %path.display(), items = file.items.len(), "Catalog loaded");

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Write the current catalog contents back to disk.
    pub async fn save(&self) -> Result<()> {
        let file = self.file.lock().await;
        let json = serde_json::to_string_pretty(&*file)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write catalog {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "Catalog saved");
        Ok(())
    }

    pub async fn entries(&self) -> Vec<CatalogEntry> {
        self.file.lock().await.items.clone()
    }
}

#[async_trait]
impl FieldWriter for JsonCatalog {
    async fn write(
        &self,
        item_id: &ItemId,
        assignment: &FieldAssignment,
    ) -> Result<(), WriteError> {
        let mut file = self.file.lock().await;
        let entry = file
            .items
            .iter_mut()
            .find(|e| e.id == item_id.as_str())
            .ok_or(WriteError::NotFound)?;

        if entry.read_only {
            return Err(WriteError::PermissionDenied);
        }

        let existing = entry
            .fields
            .iter_mut()
            .find(|f| f.namespace == assignment.namespace && f.key == assignment.key);

        match existing {
            Some(field) if field.value_type != assignment.value_type => {
                Err(WriteError::FieldTypeConflict)
            }
            Some(field) => {
                field.value = assignment.value.clone();
                Ok(())
            }
            None => {
                entry.fields.push(assignment.clone());
                Ok(())
            }
        }
    }
}

/// Picker that "selects" the catalog entries named on the command line.
pub struct CatalogPicker {
    catalog: Arc<JsonCatalog>,
    ids: Vec<String>,
}

impl CatalogPicker {
    pub fn new(catalog: Arc<JsonCatalog>, ids: Vec<String>) -> Self {
        Self { catalog, ids }
    }
}

#[async_trait]
impl PickerClient for CatalogPicker {
    async fn pick(&self, request: &PickerRequest) -> Result<PickerResponse, PickerError> {
        if self.ids.is_empty() {
            return Ok(PickerResponse::Cancelled);
        }

        let file = self.catalog.file.lock().await;
        let mut records = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            match file.items.iter().find(|e| &e.id == id) {
                Some(entry) => records.push(entry.to_raw()),
                None => tracing::warn!(id = %id, kind = %request.item_kind, "Not in catalog, not selectable"),
            }
        }

        Ok(PickerResponse::Selected(records))
    }
}

#[cfg(test)]
pub(crate) fn write_sample_catalog(dir: &Path) -> PathBuf {
    let path = dir.join("catalog.json");
    let catalog = serde_json::json!({
        "items": [
            { "id": "gid://1", "title": "Shirt", "handle": "shirt" },
            { "id": "gid://2", "title": "Hat" },
            {
                "id": "gid://3",
                "title": "Scarf",
                "fields": [{
                    "namespace": "custom",
                    "key": "custom_field",
                    "value": "7",
                    "type": "number_integer"
                }]
            },
            { "id": "gid://4", "title": "Gloves", "read_only": true }
        ]
    });
    fs::write(&path, serde_json::to_string_pretty(&catalog).unwrap()).unwrap();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkfield_core::ItemKind;
    use tempfile::TempDir;

    fn request() -> PickerRequest {
        PickerRequest {
            item_kind: ItemKind::Product,
            allow_multiple: true,
        }
    }

    #[tokio::test]
    async fn test_writer_outcomes() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonCatalog::load(write_sample_catalog(dir.path())).unwrap();
        let assignment = FieldAssignment::custom_field("SKU-42");

        catalog
            .write(&ItemId::new("gid://1"), &assignment)
            .await
            .unwrap();
        assert_eq!(
            catalog.write(&ItemId::new("gid://9"), &assignment).await,
            Err(WriteError::NotFound)
        );
        assert_eq!(
            catalog.write(&ItemId::new("gid://3"), &assignment).await,
            Err(WriteError::FieldTypeConflict)
        );
        assert_eq!(
            catalog.write(&ItemId::new("gid://4"), &assignment).await,
            Err(WriteError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_write_overwrites_same_type() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonCatalog::load(write_sample_catalog(dir.path())).unwrap();
        let id = ItemId::new("gid://2");

        catalog
            .write(&id, &FieldAssignment::custom_field("first"))
            .await
            .unwrap();
        catalog
            .write(&id, &FieldAssignment::custom_field("second"))
            .await
            .unwrap();

        let entries = catalog.entries().await;
        let hat = entries.iter().find(|e| e.id == "gid://2").unwrap();
        assert_eq!(hat.fields.len(), 1);
        assert_eq!(hat.fields[0].value, "second");
    }

    #[tokio::test]
    async fn test_save_round_trips_fields() {
        let dir = TempDir::new().unwrap();
        let path = write_sample_catalog(dir.path());
        let catalog = JsonCatalog::load(&path).unwrap();

        catalog
            .write(&ItemId::new("gid://1"), &FieldAssignment::custom_field("blue"))
            .await
            .unwrap();
        catalog.save().await.unwrap();

        let reloaded = JsonCatalog::load(&path).unwrap();
        let entries = reloaded.entries().await;
        assert_eq!(entries[0].fields[0].value, "blue");
        assert!(entries[3].read_only);
    }

    #[tokio::test]
    async fn test_picker_selects_known_ids_in_order() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(JsonCatalog::load(write_sample_catalog(dir.path())).unwrap());
        let picker = CatalogPicker::new(
            catalog,
            vec!["gid://2".to_string(), "gid://404".to_string(), "gid://1".to_string()],
        );

        match picker.pick(&request()).await.unwrap() {
            PickerResponse::Selected(records) => {
                let ids: Vec<_> = records.iter().map(|r| r.id.as_str().unwrap()).collect();
                assert_eq!(ids, vec!["gid://2", "gid://1"]);
                assert_eq!(records[1].handle.as_deref(), Some("shirt"));
            }
            other => panic!("expected selection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_picker_without_ids_is_cancelled() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(JsonCatalog::load(write_sample_catalog(dir.path())).unwrap());
        let picker = CatalogPicker::new(catalog, Vec::new());
        assert_eq!(
            picker.pick(&request()).await.unwrap(),
            PickerResponse::Cancelled
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = JsonCatalog::load(dir.path().join("missing.json")).err().unwrap();
        assert!(err.to_string().contains("failed to read catalog"));
    }
}
