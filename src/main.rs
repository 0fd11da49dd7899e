//! CLI entry point for the spendpull tool.

use anyhow::Result;
use clap::Parser;
use spendpull_core::{PullConfig, PullPipeline};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Collecting aerospace execution transactions");

    let config = PullConfig {
        max_retries: u32::from(args.max_retries),
        ..PullConfig::default()
    };

    let pipeline = PullPipeline::new(config)?;
    let stats = pipeline.run().await?;

    info!(
        requests = stats.requests,
        records = stats.records_fetched,
        rows = stats.rows_written,
        duplicates = stats.duplicates_removed,
        capped_categories = stats.categories_capped,
        "Pull complete"
    );

    Ok(())
}
