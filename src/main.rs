//! importtally - batch import outcome summaries
//!
//! A CLI tool that reads the outcome log of a batch file import,
//! tallies successes, errors and duplicates, and prints a summary
//! table with optional throughput statistics.
//!
//! Exit codes:
//!   0 - Success (or failures present without --fail-on-error)
//!   1 - Runtime error (unreadable log, malformed line, bad config, etc.)
//!   2 - Failed items present and --fail-on-error set

mod analysis;
mod cli;
mod config;
mod ingest;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    debug!("importtally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_summary(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Summary failed: {:#}", e);
            eprintln!("\nError: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .importtally.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so that stdout only carries the report.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Read, tally and report. Returns exit code (0 or 2).
fn run_summary(args: Args) -> Result<i32> {
    let mut config = Config::resolve(args.config.as_deref(), Path::new("."))?;
    config.merge_with_args(&args);

    let input_path = args.input_path();
    let source = args.source_label();

    let mut read_config = ingest::ReadConfig::from(&config.input);
    read_config.format = read_config.format.for_path(input_path);
    debug!("Reading outcomes from {} as {:?}", source, read_config.format);

    let reader = ingest::open_input(input_path)
        .with_context(|| format!("Failed to open outcome log: {}", source))?;
    let tally = ingest::tally_outcomes(reader, read_config)
        .with_context(|| format!("Failed to read outcome log: {}", source))?;

    if tally.is_empty() {
        warn!("No outcomes found in {}", source);
    }
    info!(
        "Tallied {} items: {} succeeded, {} failed, {} duplicate",
        tally.total(),
        tally.succeeded(),
        tally.failed(),
        tally.duplicate()
    );

    let summary = report::build_summary(&tally, args.elapsed_seconds(), &source);
    let output = match config.report.format {
        OutputFormat::Table => report::generate_text_report(&summary, config.report.show_items),
        OutputFormat::Markdown => {
            report::generate_markdown_report(&summary, config.report.show_items)
        }
        OutputFormat::Json => report::generate_json_report(&summary)?,
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    if config.report.fail_on_error && tally.failed() > 0 {
        eprintln!(
            "\n{} item(s) failed to import. Failing (exit code 2).",
            tally.failed()
        );
        return Ok(2);
    }

    Ok(0)
}
