//! `bulkfield apply`: write the value onto every selected item.
//!
//! Per-item failures do not stop the batch. The catalog is saved with
//! whatever was applied, the per-item table is printed, and the command
//! exits non-zero if anything failed or was skipped.

use anyhow::{Result, bail};
use bulkfield_core::{CommitResult, Item, Plan, WorkflowConfig};
use bulkfield_runtime::CancellationToken;
use clap::Args;

use super::{AssignArgs, open_session};

#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub assign: AssignArgs,

    /// Re-submit failed items once, as a second commit.
    #[arg(long, default_value_t = false)]
    pub retry_failed: bool,
}

/// Commit the plan and persist the catalog. Returns the (possibly merged) result.
pub async fn execute(
    args: &ApplyArgs,
    config: &WorkflowConfig,
    cancel: &CancellationToken,
) -> Result<(Plan, Vec<Item>, CommitResult)> {
    let session = open_session(&args.assign, config).await?;
    let orchestrator = &session.orchestrator;

    let plan = orchestrator.current_plan()?;
    let items = orchestrator.selection().current();

    let mut result = orchestrator.commit_with_cancel(plan.clone(), cancel).await?;

    if args.retry_failed && !result.is_cancelled() {
        let retry = plan.retry_failed(&result);
        if !retry.is_empty() {
            tracing::info!(items = retry.len(), "Retrying failed items");
            let second = orchestrator.commit_with_cancel(retry, cancel).await?;
            result.merge(second);
        }
    }

    session.catalog.save().await?;
    Ok((plan, items, result))
}

pub async fn run(args: &ApplyArgs, config: &WorkflowConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, no further writes will be dispatched");
                cancel.cancel();
            }
        })
    };

    let outcome = execute(args, config, &cancel).await;
    watcher.abort();
    let (plan, items, result) = outcome?;

    for entry in plan.entries() {
        let title = items
            .iter()
            .find(|i| i.id == entry.item_id)
            .map(|i| i.title.as_str())
            .unwrap_or_default();
        let outcome = result
            .get(&entry.item_id)
            .map(ToString::to_string)
            .unwrap_or_else(|| "not dispatched".to_string());
        println!("{:<12} {:<32} {}", entry.item_id.short(), title, outcome);
    }

    let summary = result.summary();
    println!();
    println!("{}", summary);

    if !result.is_complete_success() {
        bail!("commit {} did not apply to every item", result.commit_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{JsonCatalog, write_sample_catalog};
    use bulkfield_core::{CommitOutcome, ItemId};
    use tempfile::TempDir;

    fn args(path: std::path::PathBuf, ids: &[&str], retry_failed: bool) -> ApplyArgs {
        ApplyArgs {
            assign: AssignArgs {
                catalog: path,
                select: ids.iter().map(|s| s.to_string()).collect(),
                value: "  SKU-42 ".to_string(),
            },
            retry_failed,
        }
    }

    #[tokio::test]
    async fn test_apply_persists_applied_items() {
        let dir = TempDir::new().unwrap();
        let path = write_sample_catalog(dir.path());

        let (plan, _, result) = execute(
            &args(path.clone(), &["gid://1", "gid://2", "gid://3", "gid://4"], false),
            &WorkflowConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(plan.len(), 4);
        assert_eq!(result.len(), 4);
        assert_eq!(result.get(&ItemId::new("gid://1")), Some(&CommitOutcome::Applied));
        assert_eq!(
            result.get(&ItemId::new("gid://3")),
            Some(&CommitOutcome::failed("field_type_conflict"))
        );
        assert_eq!(
            result.get(&ItemId::new("gid://4")),
            Some(&CommitOutcome::failed("permission_denied"))
        );

        let entries = JsonCatalog::load(&path).unwrap().entries().await;
        assert_eq!(entries[0].fields[0].value, "SKU-42");
        assert_eq!(entries[1].fields[0].value, "SKU-42");
        assert_eq!(entries[2].fields[0].value, "7");
        assert!(entries[3].fields.is_empty());
    }

    #[tokio::test]
    async fn test_retry_failed_merges_second_attempt() {
        let dir = TempDir::new().unwrap();
        let path = write_sample_catalog(dir.path());

        let (_, _, result) = execute(
            &args(path, &["gid://1", "gid://4"], true),
            &WorkflowConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.summary().applied, 1);
        assert_eq!(result.summary().failed, 1);
    }

    #[tokio::test]
    async fn test_unknown_selection_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_sample_catalog(dir.path());

        let err = execute(
            &args(path, &["gid://404"], false),
            &WorkflowConfig::default(),
            &CancellationToken::new(),
        )
        .await
        .err()
        .unwrap();
        assert!(err.to_string().contains("none of the selected ids"));
    }
}
