//! Structural response comparison and on-disk diff reporting.

pub mod compute;
pub mod report;

pub use compute::{error_message, DiffComputer, DiffType, Difference};
pub use report::DiffReporter;
