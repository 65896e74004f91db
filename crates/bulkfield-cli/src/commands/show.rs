//! `bulkfield show`: list catalog items and their stored custom fields.

use anyhow::{Result, bail};
use std::path::Path;

use crate::catalog::JsonCatalog;

pub async fn run(catalog_path: &Path, id: Option<&str>) -> Result<()> {
    let catalog = JsonCatalog::load(catalog_path)?;
    let entries: Vec<_> = catalog
        .entries()
        .await
        .into_iter()
        .filter(|e| id.is_none_or(|wanted| e.id == wanted))
        .collect();

    if entries.is_empty() {
        if let Some(wanted) = id {
            bail!("item {} not found in {}", wanted, catalog_path.display());
        }
        println!("Catalog is empty");
        return Ok(());
    }

    for entry in entries {
        let lock = if entry.read_only { " (read-only)" } else { "" };
        println!("{}  {}{}", entry.id, entry.title, lock);
        if let Some(handle) = &entry.handle {
            println!("  handle: {}", handle);
        }
        for field in &entry.fields {
            println!(
                "  {}.{} = {} [{}]",
                field.namespace, field.key, field.value, field.value_type
            );
        }
    }

    Ok(())
}
