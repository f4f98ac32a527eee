//! Frontier bookkeeping for round-based crawling
//!
//! The frontier is keyed by URL: order is irrelevant and pushing a URL that is
//! already pending, or was crawled earlier in the run, does nothing. Entries of
//! the current round leave the frontier one by one through
//! [`Frontier::complete`]; continuations they produce are staged and only
//! become visible after [`Frontier::advance`].

use std::collections::{HashMap, HashSet};
use std::fmt;

/// A page waiting to be crawled
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrontierEntry {
    /// Absolute URL of the page
    pub url: String,

    /// Label of the start point whose lane this page belongs to
    pub lane: String,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, lane: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            lane: lane.into(),
        }
    }
}

impl fmt::Display for FrontierEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.lane, self.url)
    }
}

/// Pending pages of the current round plus continuations for the next one
#[derive(Debug, Default)]
pub struct Frontier {
    /// url -> lane, entries of the round in progress
    current: HashMap<String, String>,

    /// url -> lane, continuations enqueued during the round in progress
    staged: HashMap<String, String>,

    /// Every URL that ever entered the frontier
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier whose first round is `entries`
    pub fn new(entries: impl IntoIterator<Item = FrontierEntry>) -> Self {
        let mut current = HashMap::new();
        for entry in entries {
            current.entry(entry.url).or_insert(entry.lane);
        }
        let visited = current.keys().cloned().collect();

        Self {
            current,
            staged: HashMap::new(),
            visited,
        }
    }

    /// Returns true once nothing is pending in this round or the next
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.staged.is_empty()
    }

    /// Number of entries of the current round not yet completed
    pub fn in_flight(&self) -> usize {
        self.current.len()
    }

    /// Number of continuations waiting for the next round
    pub fn staged(&self) -> usize {
        self.staged.len()
    }

    /// Entries of the current round, sorted by URL
    pub fn snapshot(&self) -> Vec<FrontierEntry> {
        let mut entries: Vec<FrontierEntry> = self
            .current
            .iter()
            .map(|(url, lane)| FrontierEntry::new(url.clone(), lane.clone()))
            .collect();
        entries.sort_by(|a, b| a.url.cmp(&b.url));
        entries
    }

    /// Removes a processed entry and stages its continuation, if any
    ///
    /// Returns false if `url` was not pending, in which case nothing is staged.
    /// A continuation pointing at an already visited URL is ignored, which
    /// keeps a cyclic "next page" chain from looping forever.
    pub fn complete(&mut self, url: &str, next: Option<FrontierEntry>) -> bool {
        if self.current.remove(url).is_none() {
            return false;
        }

        if let Some(next) = next {
            if self.visited.insert(next.url.clone()) {
                self.staged.insert(next.url, next.lane);
            }
        }

        true
    }

    /// Closes the current round and promotes the staged continuations
    ///
    /// Entries that were never completed are discarded and returned so the
    /// caller can report them.
    pub fn advance(&mut self) -> Vec<FrontierEntry> {
        let abandoned = self
            .current
            .drain()
            .map(|(url, lane)| FrontierEntry::new(url, lane))
            .collect();
        self.current = std::mem::take(&mut self.staged);
        abandoned
    }
}
