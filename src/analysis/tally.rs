//! Outcome accumulation.
//!
//! A [`Tally`] is created empty at the start of a batch run, receives one
//! [`Outcome`] per processed item and is read once at the end to build the
//! summary report.

use crate::models::{Outcome, Status};
use tracing::trace;

/// Running counts and identifier lists of outcomes across a batch run.
///
/// `succeeded() + failed() + duplicate()` always equals the number of
/// outcomes appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    succeeded: usize,
    failed: usize,
    duplicate: usize,
    failed_items: Vec<String>,
    duplicate_items: Vec<String>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one processed item.
    ///
    /// Successful items are only counted. Failed and duplicate items also
    /// keep their identifier, in call order.
    pub fn append(&mut self, outcome: Outcome) {
        let Outcome { id, status } = outcome;
        trace!(%id, %status, "Tallying outcome");
        match status {
            Status::Succeeded => self.succeeded += 1,
            Status::Duplicate => {
                self.duplicate += 1;
                self.duplicate_items.push(id);
            }
            Status::Failed => {
                self.failed += 1;
                self.failed_items.push(id);
            }
        }
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn duplicate(&self) -> usize {
        self.duplicate
    }

    /// Number of outcomes appended so far.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.duplicate
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Identifiers of failed items in insertion order.
    pub fn failed_items(&self) -> &[String] {
        &self.failed_items
    }

    /// Identifiers of duplicate items in insertion order.
    pub fn duplicate_items(&self) -> &[String] {
        &self.duplicate_items
    }
}

impl Extend<Outcome> for Tally {
    fn extend<I: IntoIterator<Item = Outcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.append(outcome);
        }
    }
}

impl FromIterator<Outcome> for Tally {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut tally = Self::new();
        tally.extend(iter);
        tally
    }
}
