//! Outcome log reader.
//!
//! Import runs emit one outcome per processed item, either as JSON lines
//! (`{"id": "...", "status": true}`) or as delimited text
//! (`<id><TAB><status>`). This module parses those logs into [`Outcome`]s.

use crate::analysis::Tally;
use crate::models::{Outcome, Status};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors for outcome log lines that cannot be interpreted at all.
///
/// Unrecognized status values are not errors; they are counted as failures.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("line {line}: invalid JSON outcome: {source}")]
    InvalidJson {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: missing {delimiter:?} delimiter between identifier and status")]
    MissingDelimiter { line: usize, delimiter: char },

    #[error("line {line}: empty item identifier")]
    EmptyIdentifier { line: usize },

    #[error("failed to read outcome log: {0}")]
    Io(#[from] io::Error),
}

/// Layout of the outcome log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Decide from the file extension, or from the first record
    #[default]
    Auto,
    /// One JSON object per line
    Json,
    /// Identifier and status separated by a delimiter
    Delimited,
}

impl InputFormat {
    /// Resolve `Auto` from a file extension where possible.
    pub fn for_path(self, path: Option<&Path>) -> Self {
        if self != InputFormat::Auto {
            return self;
        }
        match path.and_then(|p| p.extension()).and_then(|e| e.to_str()) {
            Some("jsonl" | "ndjson") => InputFormat::Json,
            Some("tsv" | "txt" | "log") => InputFormat::Delimited,
            _ => InputFormat::Auto,
        }
    }
}

/// Settings for reading an outcome log.
#[derive(Debug, Clone)]
pub struct ReadConfig {
    pub format: InputFormat,
    /// Separator for delimited text
    pub delimiter: char,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::Auto,
            delimiter: '\t',
        }
    }
}

impl From<&crate::config::InputConfig> for ReadConfig {
    fn from(config: &crate::config::InputConfig) -> Self {
        Self {
            format: config.format,
            delimiter: config.delimiter,
        }
    }
}

/// Status as it appears in a JSON outcome record.
///
/// Variant order matters: `null` must reach `Missing` before `Other`.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum RawStatus {
    Flag(bool),
    Token(String),
    #[default]
    Missing,
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct RawOutcome {
    id: String,
    #[serde(default)]
    status: RawStatus,
}

/// Classify a textual status, folding unrecognized tokens into failures.
pub fn classify_token(id: &str, token: &str) -> Status {
    Status::from_token(token).unwrap_or_else(|| {
        warn!(
            "Unrecognized status {:?} for {}, counting it as failed",
            token.trim(),
            id
        );
        Status::Failed
    })
}

/// Streaming reader yielding one [`Outcome`] per record line.
pub struct OutcomeReader<R> {
    lines: io::Lines<R>,
    config: ReadConfig,
    line_number: usize,
}

impl<R: BufRead> OutcomeReader<R> {
    pub fn new(reader: R, config: ReadConfig) -> Self {
        Self {
            lines: reader.lines(),
            config,
            line_number: 0,
        }
    }

    fn parse_line(&mut self, line: &str) -> Result<Outcome, IngestError> {
        if self.config.format == InputFormat::Auto {
            self.config.format = if line.starts_with('{') {
                InputFormat::Json
            } else {
                InputFormat::Delimited
            };
            debug!("Detected {:?} outcome log", self.config.format);
        }

        match self.config.format {
            InputFormat::Json => self.parse_json(line),
            _ => self.parse_delimited(line),
        }
    }

    fn parse_json(&self, line: &str) -> Result<Outcome, IngestError> {
        let raw: RawOutcome =
            serde_json::from_str(line).map_err(|source| IngestError::InvalidJson {
                line: self.line_number,
                source,
            })?;

        if raw.id.trim().is_empty() {
            return Err(IngestError::EmptyIdentifier {
                line: self.line_number,
            });
        }

        let RawOutcome { id, status } = raw;
        let outcome = match status {
            RawStatus::Flag(flag) => Outcome::from((id, Some(flag))),
            RawStatus::Missing => Outcome::from((id, None)),
            RawStatus::Token(token) => {
                let status = classify_token(&id, &token);
                Outcome::new(id, status)
            }
            RawStatus::Other(value) => {
                warn!(
                    "Unrecognized status {} for {}, counting it as failed",
                    value, id
                );
                Outcome::new(id, Status::Failed)
            }
        };

        Ok(outcome)
    }

    fn parse_delimited(&self, line: &str) -> Result<Outcome, IngestError> {
        let delimiter = self.config.delimiter;
        // Identifiers may contain the delimiter; the status never does.
        let (id, token) = line
            .rsplit_once(delimiter)
            .ok_or(IngestError::MissingDelimiter {
                line: self.line_number,
                delimiter,
            })?;

        if id.trim().is_empty() {
            return Err(IngestError::EmptyIdentifier {
                line: self.line_number,
            });
        }

        Ok(Outcome::new(id, classify_token(id, token)))
    }
}

impl<R: BufRead> Iterator for OutcomeReader<R> {
    type Item = Result<Outcome, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let trimmed = line.trim_end_matches('\r');
            if trimmed.trim().is_empty() || trimmed.starts_with('#') {
                continue;
            }

            return Some(self.parse_line(trimmed));
        }
    }
}

/// Open an outcome log, reading standard input for `None` or `-`.
pub fn open_input(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p != Path::new("-") => Ok(Box::new(BufReader::new(File::open(p)?))),
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Feed every outcome of a log into a fresh tally.
///
/// Stops at the first structurally malformed line.
pub fn tally_outcomes<R: BufRead>(reader: R, config: ReadConfig) -> Result<Tally, IngestError> {
    let mut tally = Tally::new();
    for outcome in OutcomeReader::new(reader, config) {
        tally.append(outcome?);
    }
    debug!("Read {} outcomes", tally.total());
    Ok(tally)
}
