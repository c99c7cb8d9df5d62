//! Data models for import outcome reporting.
//!
//! This module contains the value types shared by the accumulator,
//! the outcome-log reader and the report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of processing a single item during an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The item was imported.
    Succeeded,
    /// The item could not be imported.
    Failed,
    /// The item matched previously imported content and was skipped.
    Duplicate,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Succeeded => write!(f, "succeeded"),
            Status::Failed => write!(f, "failed"),
            Status::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl Status {
    /// Map the import pipeline's historic tri-state encoding.
    ///
    /// `Some(true)` is a success, `None` means the checksum matched an
    /// already imported file, and `Some(false)` is a failure.
    pub fn from_legacy(value: Option<bool>) -> Self {
        match value {
            Some(true) => Status::Succeeded,
            None => Status::Duplicate,
            Some(false) => Status::Failed,
        }
    }

    /// Parse a textual status token.
    ///
    /// Returns `None` for tokens that are not recognized. Callers decide how
    /// to classify those; the outcome-log reader folds them into `Failed`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "succeeded" | "success" | "ok" | "true" | "imported" => Some(Status::Succeeded),
            "duplicate" | "dup" | "none" | "null" | "skipped" => Some(Status::Duplicate),
            "failed" | "failure" | "error" | "false" => Some(Status::Failed),
            _ => None,
        }
    }
}

/// A single processed item and its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Identifier of the item, usually its source path.
    pub id: String,
    /// What happened to the item.
    pub status: Status,
}

impl Outcome {
    pub fn new(id: impl Into<String>, status: Status) -> Self {
        Self {
            id: id.into(),
            status,
        }
    }
}

#[cfg(test)]
impl Outcome {
    pub fn succeeded(id: impl Into<String>) -> Self {
        Self::new(id, Status::Succeeded)
    }

    pub fn failed(id: impl Into<String>) -> Self {
        Self::new(id, Status::Failed)
    }

    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::new(id, Status::Duplicate)
    }
}

impl From<(String, Option<bool>)> for Outcome {
    fn from((id, status): (String, Option<bool>)) -> Self {
        Self::new(id, Status::from_legacy(status))
    }
}

/// Metadata about a summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the outcomes came from (file path or `stdin`).
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

/// Snapshot of a tally, ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub metadata: ReportMetadata,
    pub succeeded: usize,
    pub failed: usize,
    pub duplicate: usize,
    pub total: usize,
    /// Elapsed wall time of the run, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_seconds: Option<f64>,
    /// Human readable form of `elapsed_seconds`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed: Option<String>,
    /// Items per minute; absent when no time elapsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_per_minute: Option<f64>,
    pub failed_items: Vec<String>,
    pub duplicate_items: Vec<String>,
}
