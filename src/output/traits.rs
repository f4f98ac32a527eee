//! Output sink trait and errors
//!
//! A sink durably records the final letter tally of a run.

use crate::output::tally::Tally;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for tally sinks
pub trait TallySink {
    /// Records the complete tally, replacing any previous output
    fn write_tally(&self, tally: &Tally) -> OutputResult<()>;

    /// Human-readable location of the output, for log messages
    fn describe(&self) -> String;
}
