//! playtape CLI
//!
//! Applies a change file to a catalog snapshot and writes the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use playtape_core::{load_changes, BatchProcessor, Config, Snapshot, Store};

mod logging;
mod output;

use output::{BatchReport, Output, OutputFormat};

#[derive(Parser)]
#[command(name = "playtape")]
#[command(about = "Apply a batch of playlist changes to a music catalog snapshot")]
#[command(version)]
struct Cli {
    /// Catalog snapshot to read
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Change file to apply
    #[arg(long, value_name = "FILE")]
    changes: PathBuf,

    /// Where to write the updated snapshot
    #[arg(long, value_name = "FILE")]
    out: PathBuf,

    /// Reject snapshots with duplicate IDs or dangling references
    #[arg(long)]
    strict: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Quiet mode - only report problems
    #[arg(short, long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().context("Failed to load configuration")?;
    if cli.strict {
        config.strict_load = true;
    }

    logging::init(&config.log_level, cli.verbose);

    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    run(&cli, &config, &output)
}

fn run(cli: &Cli, config: &Config, output: &Output) -> Result<()> {
    let snapshot = Snapshot::load(&cli.input)
        .with_context(|| format!("Problem reading the data store file ({:?})", cli.input))?;

    let records = load_changes(&cli.changes)
        .with_context(|| format!("Problem reading the changes file ({:?})", cli.changes))?;

    let mut store = Store::from_snapshot(snapshot, &config.load_options())
        .with_context(|| format!("Inconsistent data store file ({:?})", cli.input))?;

    let mut processor = BatchProcessor::new(records, &mut store);
    let outcome = processor.process_all();
    let report = BatchReport {
        applied: processor.succeeded(),
        failures: processor.errors().to_vec(),
        out: cli.out.clone(),
    };

    // Partial results are still written when some commands failed
    store
        .into_snapshot()
        .save(&cli.out)
        .with_context(|| format!("Problem writing data store to file ({:?})", cli.out))?;
    info!("Wrote {:?}", cli.out);

    output.print_report(&report);

    outcome.context("Problem executing changes")
}
