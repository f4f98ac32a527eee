//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the round loop that coordinates the crawl:
//! - Bootstrapping lanes from the root index
//! - Running one concurrent unit (fetch, extract, decide) per frontier entry
//! - Waiting for every unit of a round before the next round starts
//! - Collecting items and run statistics
//!
//! Units share two pieces of state, the item set and the frontier, both
//! behind a `std::sync::Mutex` that is never held across an await. Start
//! points are shared read-only.

use crate::config::{validate, Config};
use crate::crawler::bootstrap::{bootstrap, Bootstrap};
use crate::crawler::fetcher::{FetchError, HttpFetcher, PageSource};
use crate::crawler::lanes::{decide, LaneDecision, StartPoints};
use crate::crawler::parser::{parse_listing, CategoryLayout};
use crate::output::CrawlStatistics;
use crate::state::{Frontier, FrontierEntry, ItemSet};
use crate::CensusError;
use futures_util::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;

/// How a single unit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The lane continues with `next` in the following round
    Continued { next: String },

    /// The lane found no neighbour but the page has no next-page link
    Exhausted,

    /// The lane reached another lane's start point and halts
    Converged { prefix: String },

    /// No countable names on the page; the lane halts
    Empty,

    /// The page could not be fetched; the lane halts
    Failed(FetchError),
}

/// Result of processing one frontier entry
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub entry: FrontierEntry,

    /// Names that survived extraction on this page
    pub names_found: usize,

    /// Names that were not in the item set yet
    pub names_added: usize,

    pub outcome: UnitOutcome,
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub items: ItemSet,
    pub stats: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    source: Arc<dyn PageSource>,
    layout: Arc<CategoryLayout>,
    root_url: String,
    permits: Arc<Semaphore>,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CensusError)` - The HTTP client or page layout could not be built
    pub fn new(config: &Config) -> Result<Self, CensusError> {
        let fetcher = HttpFetcher::from_config(config)?;
        Self::with_source(config, Arc::new(fetcher))
    }

    /// Creates a coordinator over any page source
    ///
    /// The configuration is validated first, the same way a loaded
    /// configuration file is.
    pub fn with_source(config: &Config, source: Arc<dyn PageSource>) -> Result<Self, CensusError> {
        validate(config)?;
        let layout = CategoryLayout::from_config(config)?;
        let permits = (config.crawler.max_concurrent_pages_open as usize).max(1);

        Ok(Self {
            source,
            layout: Arc::new(layout),
            root_url: config.source.root_url.clone(),
            permits: Arc::new(Semaphore::new(permits)),
        })
    }

    /// Bootstraps from the root index and crawls every lane to its end
    pub async fn run(&self) -> Result<CrawlReport, CensusError> {
        let boot = bootstrap(self.source.as_ref(), &self.root_url, &self.layout).await?;
        self.crawl(boot).await
    }

    /// Runs rounds until the frontier is empty
    ///
    /// Each round spawns one task per frontier entry and joins all of them
    /// before the frontier for the next round is read. Page failures end
    /// their lane and are counted; they never fail the crawl.
    pub async fn crawl(&self, boot: Bootstrap) -> Result<CrawlReport, CensusError> {
        let start_time = Instant::now();
        let Bootstrap {
            frontier,
            start_points,
        } = boot;

        let mut stats = CrawlStatistics::new(start_points.len());
        let frontier = Arc::new(Mutex::new(Frontier::new(frontier)));
        let items = Arc::new(Mutex::new(ItemSet::new()));

        tracing::info!("Starting crawl over {} lanes", start_points.len());

        loop {
            let batch = {
                let frontier = lock(&frontier);
                if frontier.is_empty() {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
                frontier.snapshot()
            };

            stats.rounds += 1;
            tracing::info!("Round {}: fetching {} pages", stats.rounds, batch.len());

            let handles: Vec<_> = batch
                .iter()
                .cloned()
                .map(|entry| {
                    let unit = Unit {
                        source: Arc::clone(&self.source),
                        layout: Arc::clone(&self.layout),
                        start_points: start_points.clone(),
                        frontier: Arc::clone(&frontier),
                        items: Arc::clone(&items),
                        permits: Arc::clone(&self.permits),
                    };
                    tokio::spawn(unit.process(entry))
                })
                .collect();

            // Round barrier
            let results = join_all(handles).await;

            for (entry, result) in batch.into_iter().zip(results) {
                match result {
                    Ok(report) => record_unit(&mut stats, &report),
                    Err(e) => {
                        tracing::error!("Crawl unit for {} did not finish: {}", entry, e);
                        lock(&frontier).complete(&entry.url, None);
                        stats.unknown_errors += 1;
                    }
                }
            }

            let (item_count, next_round) = {
                let mut frontier = lock(&frontier);
                let queued = frontier.staged();
                for entry in frontier.advance() {
                    tracing::warn!("Dropping unfinished frontier entry {}", entry);
                }
                (lock(&items).len(), queued)
            };
            stats.items_per_round.push(item_count);

            tracing::info!(
                "Round {} done: {} distinct items, {} pages queued",
                stats.rounds,
                item_count,
                next_round
            );
        }

        stats.elapsed = start_time.elapsed();
        let items = std::mem::take(&mut *lock(&items));

        tracing::info!(
            "Crawl finished in {:.2}s: {} rounds, {} distinct items, {} failed pages",
            stats.elapsed.as_secs_f64(),
            stats.rounds,
            items.len(),
            stats.pages_failed()
        );

        Ok(CrawlReport { items, stats })
    }
}

/// Shared handles one unit needs
struct Unit {
    source: Arc<dyn PageSource>,
    layout: Arc<CategoryLayout>,
    start_points: StartPoints,
    frontier: Arc<Mutex<Frontier>>,
    items: Arc<Mutex<ItemSet>>,
    permits: Arc<Semaphore>,
}

impl Unit {
    /// Processes one entry and removes it from the frontier exactly once
    async fn process(self, entry: FrontierEntry) -> UnitReport {
        let report = self.fetch_and_decide(entry).await;

        let next = match &report.outcome {
            UnitOutcome::Continued { next } => {
                Some(FrontierEntry::new(next.clone(), report.entry.lane.clone()))
            }
            _ => None,
        };
        lock(&self.frontier).complete(&report.entry.url, next);

        report
    }

    async fn fetch_and_decide(&self, entry: FrontierEntry) -> UnitReport {
        let fetched = {
            // A closed semaphore only means no limit
            let _permit = self.permits.acquire().await.ok();
            self.source.fetch(&entry.url).await
        };

        let body = match fetched {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!("Failed to fetch {} ({}): {}", entry, error.label(), error);
                return UnitReport {
                    entry,
                    names_found: 0,
                    names_added: 0,
                    outcome: UnitOutcome::Failed(error),
                };
            }
        };

        let page = parse_listing(&body, &self.layout);
        let names_found = page.names.len();
        let names_added = lock(&self.items).extend(page.names.iter().cloned());

        let outcome = match decide(&page.names, &self.start_points) {
            LaneDecision::Continue => match page.next_page {
                Some(next) => UnitOutcome::Continued { next },
                None => UnitOutcome::Exhausted,
            },
            LaneDecision::Converged { prefix } => UnitOutcome::Converged { prefix },
            LaneDecision::Empty => UnitOutcome::Empty,
        };

        tracing::debug!(
            "Processed {}: {} names ({} new), {:?}",
            entry,
            names_found,
            names_added,
            outcome
        );

        UnitReport {
            entry,
            names_found,
            names_added,
            outcome,
        }
    }
}

fn record_unit(stats: &mut CrawlStatistics, report: &UnitReport) {
    match &report.outcome {
        UnitOutcome::Continued { .. } => stats.pages_fetched += 1,
        UnitOutcome::Exhausted => {
            stats.pages_fetched += 1;
            stats.lanes_exhausted += 1;
            tracing::debug!("Lane {} reached its last page", report.entry.lane);
        }
        UnitOutcome::Converged { prefix } => {
            stats.pages_fetched += 1;
            stats.lanes_converged += 1;
            tracing::debug!(
                "Lane {} reached start point {} at {}",
                report.entry.lane,
                prefix,
                report.entry.url
            );
        }
        UnitOutcome::Empty => {
            stats.pages_fetched += 1;
            stats.empty_pages += 1;
            tracing::debug!("Lane {} stopped on an empty page", report.entry.lane);
        }
        UnitOutcome::Failed(error) => match error {
            FetchError::Timeout { .. } => stats.timeouts += 1,
            FetchError::Http { .. } => stats.http_errors += 1,
            FetchError::Unknown { .. } => stats.unknown_errors += 1,
        },
    }
}

/// Locks a mutex, recovering the data if a unit panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use category_census::config::Config;
/// use category_census::crawler::run_census;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_census(&Config::default()).await?;
/// println!("{} distinct items", report.items.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_census(config: &Config) -> Result<CrawlReport, CensusError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
