//! Output module for crawl results
//!
//! This module handles:
//! - Tallying the distinct items by leading letter
//! - Writing the tally to a CSV file
//! - Recording and printing crawl statistics

mod csv;
pub mod stats;
mod tally;
mod traits;

pub use csv::{write_tally_csv, CsvTallySink};
pub use stats::{print_statistics, CrawlStatistics};
pub use tally::{tally, Tally};
pub use traits::{OutputError, OutputResult, TallySink};
