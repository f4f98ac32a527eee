//! Index bootstrapping
//!
//! Reads the root index page once and turns its bucket links into the first
//! crawl round and the start points of all lanes.

use crate::crawler::fetcher::PageSource;
use crate::crawler::lanes::StartPoints;
use crate::crawler::parser::{parse_index, CategoryLayout};
use crate::state::FrontierEntry;
use crate::CensusError;
use std::collections::HashSet;

/// Initial crawl state produced from the root index
#[derive(Debug, Clone)]
pub struct Bootstrap {
    /// One entry per bucket, in index order
    pub frontier: Vec<FrontierEntry>,

    /// Bucket labels, aligned with `frontier`
    pub start_points: StartPoints,
}

/// Fetches and parses the root index
///
/// Any failure here is fatal to the run: a fetch error becomes
/// [`CensusError::Bootstrap`] and an index without bucket links becomes
/// [`CensusError::EmptyIndex`].
pub async fn bootstrap(
    source: &dyn PageSource,
    root_url: &str,
    layout: &CategoryLayout,
) -> Result<Bootstrap, CensusError> {
    tracing::info!("Reading category index: {}", root_url);

    let body = source
        .fetch(root_url)
        .await
        .map_err(|error| CensusError::Bootstrap {
            url: root_url.to_string(),
            source: error,
        })?;

    let mut seen = HashSet::new();
    let mut frontier = Vec::new();
    for entry in parse_index(&body, layout) {
        if !seen.insert(entry.label.clone()) {
            tracing::warn!(
                "Duplicate index label '{}' ({}), keeping the first occurrence",
                entry.label,
                entry.url
            );
            continue;
        }
        frontier.push(FrontierEntry::new(entry.url, entry.label));
    }

    if frontier.is_empty() {
        return Err(CensusError::EmptyIndex {
            url: root_url.to_string(),
        });
    }

    let start_points = StartPoints::new(frontier.iter().map(|entry| entry.lane.clone()));

    tracing::info!(
        "Index lists {} start points: {}",
        start_points.len(),
        start_points.iter().collect::<Vec<_>>().join(", ")
    );

    Ok(Bootstrap {
        frontier,
        start_points,
    })
}
