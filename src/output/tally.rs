//! Letter tally of collected items

use std::collections::BTreeMap;

/// Count of distinct items per leading letter, sorted by letter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    rows: Vec<(char, usize)>,
}

impl Tally {
    /// Rows in ascending letter order
    pub fn rows(&self) -> &[(char, usize)] {
        &self.rows
    }

    /// Count for one letter, if any item starts with it
    pub fn get(&self, letter: char) -> Option<usize> {
        self.rows
            .binary_search_by(|(l, _)| l.cmp(&letter))
            .ok()
            .map(|i| self.rows[i].1)
    }

    /// Number of items counted across all letters
    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Groups names by their first character and counts them
///
/// Letters are ordered by code point, so the output depends only on the set
/// of names and never on iteration order. Empty names are ignored. Callers
/// pass already-distinct names (an [`ItemSet`](crate::state::ItemSet));
/// repeated names are counted as often as they appear.
///
/// # Example
///
/// ```
/// use category_census::output::tally;
///
/// let result = tally(["Аист", "Антилопа", "Бобр"]);
/// assert_eq!(result.rows(), &[('А', 2), ('Б', 1)]);
/// ```
pub fn tally<I>(names: I) -> Tally
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    for name in names {
        if let Some(letter) = name.as_ref().chars().next() {
            *counts.entry(letter).or_insert(0) += 1;
        }
    }

    Tally {
        rows: counts.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemSet;

    #[test]
    fn test_tally_groups_and_sorts() {
        let items: ItemSet = ["Бобр", "Аист", "Антилопа"].into_iter().collect();
        let result = tally(&items);

        assert_eq!(result.rows(), &[('А', 2), ('Б', 1)]);
        assert_eq!(result.total(), 3);
    }

    #[test]
    fn test_tally_ignores_input_order() {
        let forward = tally(["Волк", "Аист", "Бобр", "Выдра"]);
        let backward = tally(["Выдра", "Бобр", "Аист", "Волк"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_tally_is_case_sensitive_by_code_point() {
        let result = tally(["ёж", "Ёрш", "Аист"]);
        // Ё (U+0401) < А (U+0410) < ё (U+0451)
        assert_eq!(result.rows(), &[('Ё', 1), ('А', 1), ('ё', 1)]);
    }

    #[test]
    fn test_tally_skips_empty_names() {
        let result = tally(["", "Аист"]);
        assert_eq!(result.rows(), &[('А', 1)]);
    }

    #[test]
    fn test_get_and_empty() {
        let result = tally(["Аист", "Бобр", "Барсук"]);
        assert_eq!(result.get('Б'), Some(2));
        assert_eq!(result.get('В'), None);

        assert!(tally(Vec::<String>::new()).is_empty());
    }
}
