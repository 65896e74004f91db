use anyhow::{Context, Result};
use bulkfield_core::WorkflowConfig;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod catalog;
mod commands;

use commands::AssignArgs;
use commands::apply::ApplyArgs;

#[derive(Parser, Debug)]
#[command(
    name = "bulkfield",
    version,
    about = "Assign one custom field value to many catalog items"
)]
struct Cli {
    /// Workflow configuration file (YAML).
    #[arg(long, global = true, env = "BULKFIELD_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the fields that `apply` would write, without writing them.
    Preview(AssignArgs),

    /// Write the value onto every selected item.
    Apply(ApplyArgs),

    /// List catalog items and their custom fields.
    Show {
        /// Catalog JSON file.
        #[arg(long)]
        catalog: PathBuf,

        /// Only show this item.
        #[arg(long)]
        id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Preview(args) => commands::preview::run(&args, &config).await?,
        Command::Apply(args) => commands::apply::run(&args, &config).await?,
        Command::Show { catalog, id } => commands::show::run(&catalog, id.as_deref()).await?,
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<WorkflowConfig> {
    match path {
        Some(path) => {
            tracing::info!(config = %path.display(), "Loading configuration");
            WorkflowConfig::from_file(path)
                .with_context(|| format!("invalid configuration in {}", path.display()))
        }
        None => Ok(WorkflowConfig::default()),
    }
}
