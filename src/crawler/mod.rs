//! Crawler module for category index crawling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with error classification
//! - Index and listing page extraction
//! - Lane start points and the convergence test
//! - Round-based crawl coordination

mod bootstrap;
mod coordinator;
mod fetcher;
mod lanes;
mod parser;

pub use bootstrap::{bootstrap, Bootstrap};
pub use coordinator::{run_census, Coordinator, CrawlReport, UnitOutcome, UnitReport};
pub use fetcher::{build_http_client, fetch_page, FetchError, HttpFetcher, PageSource};
pub use lanes::{decide, prefix_of, LaneDecision, StartPoints, PREFIX_LEN};
pub use parser::{parse_index, parse_listing, CategoryLayout, IndexEntry, ListingPage};
