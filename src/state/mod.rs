//! State module for tracking crawl progress
//!
//! This module provides the two pieces of mutable state a crawl owns:
//!
//! - `Frontier`: the set of pages waiting to be fetched, split into the round
//!   being processed and the continuations staged for the next round
//! - `ItemSet`: the append-only set of item names collected so far
//!
//! Neither type is internally synchronized; the coordinator wraps them in a
//! mutex and never holds the guard across an await.

mod frontier;
mod item_set;

// Re-export main types
pub use frontier::{Frontier, FrontierEntry};
pub use item_set::ItemSet;
