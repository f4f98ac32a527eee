//! Lane boundaries and the convergence test
//!
//! Every start point opens one lane. A lane keeps following "next page" links
//! until a page shows names whose two-letter prefix belongs to another lane's
//! start point; at that point the neighbour is assumed to cover the rest.
//!
//! The test is a heuristic over alphabetic order. Near a boundary two lanes can
//! both keep going for a page (duplicates, absorbed by the item set) or both
//! stop early (a tail of names is missed).

use std::collections::HashSet;
use std::sync::Arc;

/// Prefix length used to compare names with start points
pub const PREFIX_LEN: usize = 2;

/// The start-point prefixes of all lanes, fixed at bootstrap
///
/// Backed by a shared immutable slice: clones are cheap and there is no
/// mutating API, so concurrent units can read it without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPoints(Arc<[String]>);

impl StartPoints {
    /// Builds the start points, keeping the first occurrence of each prefix
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let distinct: Vec<String> = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|prefix| seen.insert(prefix.clone()))
            .collect();
        Self(distinct.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.0.iter().any(|p| p == prefix)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Start points of every lane except the one beginning at `own`
    pub fn others<'a>(&'a self, own: &str) -> HashSet<&'a str> {
        self.iter().filter(|prefix| *prefix != own).collect()
    }
}

/// First [`PREFIX_LEN`] characters of a name (fewer if the name is shorter)
pub fn prefix_of(name: &str) -> String {
    name.chars().take(PREFIX_LEN).collect()
}

/// What a lane does after processing a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaneDecision {
    /// No neighbouring prefix seen; follow the next-page link
    Continue,

    /// The page reached a neighbouring lane's start point
    Converged { prefix: String },

    /// Nothing survived extraction, so there is nothing to compare
    Empty,
}

/// Decides whether the lane that produced `names` keeps going
///
/// The page's own prefix is that of its first name; it is excluded from the
/// comparison so a lane never halts on its own start point.
///
/// # Example
///
/// ```
/// use category_census::crawler::{decide, LaneDecision, StartPoints};
///
/// let start_points = StartPoints::new(["Ав", "Ан"]);
/// let names = vec!["Австралия".to_string(), "Анна".to_string()];
/// assert_eq!(
///     decide(&names, &start_points),
///     LaneDecision::Converged { prefix: "Ан".to_string() }
/// );
/// ```
pub fn decide(names: &[String], start_points: &StartPoints) -> LaneDecision {
    let Some(first) = names.first() else {
        return LaneDecision::Empty;
    };

    match find_intersections(names, &start_points.others(&prefix_of(first))) {
        Some(prefix) => LaneDecision::Converged { prefix },
        None => LaneDecision::Continue,
    }
}

/// Returns the smallest page prefix that is also another lane's start point
fn find_intersections(names: &[String], others: &HashSet<&str>) -> Option<String> {
    names
        .iter()
        .map(|name| prefix_of(name))
        .filter(|prefix| others.contains(prefix.as_str()))
        .min()
}
