//! `bulkfield preview`: show what `apply` would write, without writing.

use anyhow::Result;
use bulkfield_core::{PlanPreview, WorkflowConfig};

use super::{AssignArgs, open_session};

pub async fn build(args: &AssignArgs, config: &WorkflowConfig) -> Result<PlanPreview> {
    let session = open_session(args, config).await?;
    let plan = session.orchestrator.current_plan()?;
    let items = session.orchestrator.selection().current();
    Ok(PlanPreview::new(&plan, &items))
}

pub async fn run(args: &AssignArgs, config: &WorkflowConfig) -> Result<()> {
    let preview = build(args, config).await?;
    print!("{}", preview);
    Ok(())
}
