//! Materialized write plans and their human-readable preview.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::dedup::dedup_last_wins;
use crate::field::FieldAssignment;
use crate::item::{Item, ItemId};
use crate::result::{CommitOutcome, CommitResult};

/// One planned write: `assignment` onto the item `item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub item_id: ItemId,
    pub assignment: FieldAssignment,
}

impl PlanEntry {
    pub fn new(item_id: impl Into<ItemId>, assignment: FieldAssignment) -> Self {
        Self {
            item_id: item_id.into(),
            assignment,
        }
    }
}

/// An ordered list of per-item writes, at most one per item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlanRepr")]
pub struct Plan {
    entries: Vec<PlanEntry>,
}

/// Wire shape of a [`Plan`]; decoding goes through [`Plan::new`].
#[derive(Deserialize)]
struct PlanRepr {
    #[serde(default)]
    entries: Vec<PlanEntry>,
}

impl From<PlanRepr> for Plan {
    fn from(repr: PlanRepr) -> Self {
        Plan::new(repr.entries)
    }
}

impl Plan {
    /// Build a plan from entries. Repeated item ids collapse to the last entry.
    pub fn new(entries: impl IntoIterator<Item = PlanEntry>) -> Self {
        Self {
            entries: dedup_last_wins(entries, |e| e.item_id.clone()),
        }
    }

    /// A plan for exactly one item, e.g. to retry a single failed write.
    pub fn single(item_id: impl Into<ItemId>, assignment: FieldAssignment) -> Self {
        Self {
            entries: vec![PlanEntry::new(item_id, assignment)],
        }
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PlanEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn item_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.entries.iter().map(|e| &e.item_id)
    }

    /// Sub-plan holding only the entries that failed in `result`.
    pub fn retry_failed(&self, result: &CommitResult) -> Plan {
        Plan {
            entries: self
                .entries
                .iter()
                .filter(|e| matches!(result.get(&e.item_id), Some(CommitOutcome::Failed { .. })))
                .cloned()
                .collect(),
        }
    }
}

impl IntoIterator for Plan {
    type Item = PlanEntry;
    type IntoIter = std::vec::IntoIter<PlanEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A single line of a [`PlanPreview`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewLine {
    pub item_id: ItemId,
    pub title: String,
    pub assignment: FieldAssignment,
}

/// What a commit of a plan would write, without writing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPreview {
    pub value: String,
    pub lines: Vec<PreviewLine>,
}

impl PlanPreview {
    /// Render `plan`, taking display titles from `items` where available.
    pub fn new(plan: &Plan, items: &[Item]) -> Self {
        let titles: HashMap<&ItemId, &str> =
            items.iter().map(|i| (&i.id, i.title.as_str())).collect();

        let lines: Vec<PreviewLine> = plan
            .entries()
            .iter()
            .map(|e| PreviewLine {
                item_id: e.item_id.clone(),
                title: titles.get(&e.item_id).copied().unwrap_or_default().to_string(),
                assignment: e.assignment.clone(),
            })
            .collect();

        let value = lines
            .first()
            .map(|l| l.assignment.value.clone())
            .unwrap_or_default();

        Self { value, lines }
    }
}

impl fmt::Display for PlanPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Custom field value: {}", self.value)?;
        writeln!(f, "Items to update: {}", self.lines.len())?;
        for (idx, line) in self.lines.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Item {} - {}", idx + 1, line.title)?;
            writeln!(f, "  id: {}", line.item_id)?;
            writeln!(f, "  field that would be written:")?;
            writeln!(f, "    namespace: {}", line.assignment.namespace)?;
            writeln!(f, "    key: {}", line.assignment.key)?;
            writeln!(f, "    value: {}", line.assignment.value)?;
            writeln!(f, "    type: {}", line.assignment.value_type)?;
        }
        Ok(())
    }
}
