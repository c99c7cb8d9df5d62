//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::ingest::InputFormat;
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// importtally - summarize the outcome log of a batch import
///
/// Reads one outcome per processed item (success, error or duplicate),
/// tallies them and prints a summary table with optional throughput.
///
/// Examples:
///   importtally outcomes.tsv
///   importtally outcomes.jsonl --elapsed 125 --show-items
///   import-run | importtally - --started-at 2026-10-15T09:30:00Z
///   importtally outcomes.tsv --format json --output summary.json
///   importtally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Outcome log to read
    ///
    /// Reads standard input when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Wall time of the import run in seconds
    ///
    /// Enables the "Time elapsed" and "Processing rate" rows.
    #[arg(long, value_name = "SECS", conflicts_with = "started_at")]
    pub elapsed: Option<f64>,

    /// Start of the import run (RFC 3339); elapsed time is measured until now
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_timestamp)]
    pub started_at: Option<DateTime<Utc>>,

    /// Output format (table, markdown, json)
    #[arg(long, value_name = "FORMAT", env = "IMPORTTALLY_FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List failed and duplicate identifiers below the summary
    #[arg(long)]
    pub show_items: bool,

    /// Layout of the outcome log (auto, json, delimited)
    #[arg(long, value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    /// Separator between identifier and status in delimited logs
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Exit with code 2 if any item failed
    ///
    /// Useful for CI pipelines and cron jobs.
    #[arg(long)]
    pub fail_on_error: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .importtally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .importtally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain-text table (default)
    #[default]
    Table,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp: {}", e))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The input path, with `-` meaning standard input.
    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|p| *p != Path::new("-"))
    }

    /// Human-readable label of the outcome source.
    pub fn source_label(&self) -> String {
        self.input_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string())
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(elapsed) = self.elapsed {
            if !elapsed.is_finite() || elapsed < 0.0 {
                return Err("Elapsed time must be a non-negative number of seconds".to_string());
            }
        }

        if let Some(started_at) = self.started_at {
            if started_at > Utc::now() {
                return Err(format!("Start time {} is in the future", started_at));
            }
        }

        if let Some(input) = self.input_path() {
            if !input.is_file() {
                return Err(format!("Outcome log not found: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Elapsed seconds from `--elapsed` or `--started-at`, if either is set.
    pub fn elapsed_seconds(&self) -> Option<f64> {
        if let Some(elapsed) = self.elapsed {
            return Some(elapsed);
        }
        self.started_at.map(|start| {
            let millis = (Utc::now() - start).num_milliseconds().max(0);
            millis as f64 / 1000.0
        })
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
