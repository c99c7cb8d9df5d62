//! Outcome analysis.
//!
//! Accumulates per-item outcomes of an import run.

pub mod tally;

pub use tally::*;
