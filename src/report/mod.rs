//! Summary report rendering.

pub mod format;
pub mod generator;

pub use generator::*;
