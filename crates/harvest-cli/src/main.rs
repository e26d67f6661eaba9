mod categorize;
mod collect;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "harvest")]
#[command(about = "Collect recent posts for a search query and group them by recency")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect posts for a query, then write the CSV and categorized exports
    Collect {
        /// Search query to collect posts for
        #[arg(long)]
        query: String,

        /// Number of unique posts to collect (default: `HARVEST_TARGET_COUNT`)
        #[arg(long)]
        target: Option<usize>,

        /// Pause after each advance, in milliseconds (default: `HARVEST_SCROLL_PAUSE_MS`)
        #[arg(long)]
        scroll_pause_ms: Option<u64>,

        /// Unchanged advances before the feed counts as exhausted
        /// (default: `HARVEST_STAGNATION_THRESHOLD`)
        #[arg(long)]
        stagnation_threshold: Option<u32>,

        /// Replay a recorded JSON feed instead of querying the live provider
        #[arg(long)]
        fixture: Option<PathBuf>,

        /// Directory for export files (default: `HARVEST_OUTPUT_DIR`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Re-group a previously exported CSV by recency against the current time
    Categorize {
        /// CSV file written by `collect`
        #[arg(long)]
        input: PathBuf,

        /// Directory for the categorized files (default: `HARVEST_OUTPUT_DIR`)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = harvest_core::load_harvest_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Collect {
            query,
            target,
            scroll_pause_ms,
            stagnation_threshold,
            fixture,
            out_dir,
        }) => {
            let params =
                collect::resolve_params(&config.run, target, scroll_pause_ms, stagnation_threshold)
                    .context("invalid run parameters")?;
            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            collect::run_collect(&config, &query, &params, fixture.as_deref(), &out_dir).await?;
        }
        Some(Commands::Categorize { input, out_dir }) => {
            let out_dir = out_dir.unwrap_or_else(|| config.output_dir.clone());
            categorize::run_categorize(&input, &out_dir)?;
        }
        None => println!("no command given; run `harvest --help` for usage"),
    }

    Ok(())
}
