//! Append-only set of item names
//!
//! Every surviving name from every listing page ends up here; duplicates from
//! overlapping lanes collapse on insert.

use std::collections::hash_set;
use std::collections::HashSet;

/// Distinct item names collected during a crawl
///
/// Deduplicated by exact string identity. There is no way to remove a name:
/// the set only grows for the lifetime of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemSet {
    names: HashSet<String>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name, returning true if it was not present yet
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Adds every name, returning how many were new
    pub fn extend<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .map(|name| self.insert(name))
            .filter(|added| *added)
            .count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, String> {
        self.names.iter()
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a String;
    type IntoIter = hash_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for ItemSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
