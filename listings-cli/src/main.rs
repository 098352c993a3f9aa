//! Listings CLI — fetch the "other listed" symbol directory and publish it.
//!
//! Running `listings` with no arguments performs the full pipeline with the
//! built-in defaults, writing `data/nyse-listed.csv`, `data/other-listed.csv`
//! and `datapackage.json` in the current directory.

use anyhow::{Context, Result};
use clap::Parser;
use listings_core::{Pipeline, PipelineConfig, RunSummary};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "listings",
    about = "Fetch NYSE and other listings and write CSV tables + datapackage.json"
)]
struct Cli {
    /// Optional TOML file overriding the source URL, output names, etc.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory the outputs are written under. Defaults to the current directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Every failure kind collapses into the same message and exit status.
    match run(&cli) {
        Ok(summary) => report(&summary),
        Err(err) => {
            tracing::error!("error processing data: {err:#}");
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let pipeline = Pipeline::from_config(config)?.with_root(cli.root.clone());
    Ok(pipeline.run()?)
}

fn report(summary: &RunSummary) {
    let created = summary
        .created_at
        .map(|ts| ts.to_string())
        .unwrap_or_else(|| "unknown".into());

    tracing::info!(
        parsed = summary.rows_parsed,
        kept = summary.rows_kept,
        created = %created,
        snapshot = %summary.snapshot_hash,
        "done"
    );
    for t in &summary.tables {
        println!("{:<14} {:>6} rows  {}", t.name, t.rows, t.path.display());
    }
    println!("{:<14} {:>6}       {}", "datapackage", "", summary.datapackage.display());
}
