//! Category-Census: a concurrent category-index crawler
//!
//! This crate walks a paginated, alphabetically bucketed category listing from
//! several start points at once, stops each crawl lane when it runs into a
//! neighbouring lane's territory, and tallies the distinct items it found by
//! leading letter.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;

use thiserror::Error;

pub use crawler::FetchError;
pub use output::OutputError;

/// Main error type for Category-Census operations
///
/// Only run-level failures live here. Page-level failures are
/// [`FetchError`]s and never abort a crawl.
#[derive(Debug, Error)]
pub enum CensusError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read category index {url}: {source}")]
    Bootstrap { url: String, source: FetchError },

    #[error("Category index {url} lists no entry pages")]
    EmptyIndex { url: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for Category-Census operations
pub type Result<T> = std::result::Result<T, CensusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_census, Coordinator, CrawlReport};
pub use output::{tally, Tally};
pub use state::ItemSet;
