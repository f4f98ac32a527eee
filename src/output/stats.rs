//! Run statistics
//!
//! Counters gathered by the coordinator while it crawls, plus a printer for
//! the end-of-run summary.

use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Number of lanes (start points) the crawl began with
    pub lanes: usize,

    /// Number of completed rounds
    pub rounds: usize,

    /// Pages fetched and parsed successfully
    pub pages_fetched: u64,

    /// Pages that timed out
    pub timeouts: u64,

    /// Pages that failed with an HTTP status or transport error
    pub http_errors: u64,

    /// Pages that failed for any other reason, including panicked units
    pub unknown_errors: u64,

    /// Lanes that stopped on a neighbouring start point
    pub lanes_converged: u64,

    /// Lanes that ran out of next-page links
    pub lanes_exhausted: u64,

    /// Lanes that stopped on a page with no countable names
    pub empty_pages: u64,

    /// Size of the item set after each round
    pub items_per_round: Vec<usize>,

    /// Wall-clock time of the crawl
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new(lanes: usize) -> Self {
        Self {
            lanes,
            ..Self::default()
        }
    }

    /// Total number of failed pages
    pub fn pages_failed(&self) -> u64 {
        self.timeouts + self.http_errors + self.unknown_errors
    }

    /// Number of distinct items at the end of the crawl
    pub fn items(&self) -> usize {
        self.items_per_round.last().copied().unwrap_or(0)
    }

    /// Returns the success rate as a percentage of attempted pages
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.pages_failed();
        if attempted == 0 {
            return 0.0;
        }
        (self.pages_fetched as f64 / attempted as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Lanes: {}", stats.lanes);
    println!("  Rounds: {}", stats.rounds);
    println!("  Distinct items: {}", stats.items());
    println!("  Elapsed: {:.2}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    if stats.pages_failed() > 0 {
        println!("  Failed: {}", stats.pages_failed());
        println!("    Timeouts: {}", stats.timeouts);
        println!("    HTTP errors: {}", stats.http_errors);
        println!("    Unknown errors: {}", stats.unknown_errors);
    }
    println!();

    println!("Lane endings:");
    println!("  Converged with a neighbour: {}", stats.lanes_converged);
    println!("  Out of next-page links: {}", stats.lanes_exhausted);
    println!("  Empty page: {}", stats.empty_pages);
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        stats.success_rate(),
        stats.pages_fetched,
        stats.pages_fetched + stats.pages_failed()
    );
}
