// 📋 Priority List - ordered entity ids, reconciled against the catalog
//
// Ranks are never stored: a row's rank is its position + 1, so they stay
// contiguous after every relocation.

use crate::catalog::Catalog;
use crate::reorder::DropSide;
use crate::validation::split_lines;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityList {
    ids: Vec<String>,
}

impl PriorityList {
    /// Initial order: every catalog id in catalog iteration order
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            ids: catalog.ids().map(str::to_string).collect(),
        }
    }

    /// Rebuild from free text, dropping lines that are not catalog ids.
    /// Catalog ids absent from the text are simply not listed.
    pub fn from_text(text: &str, catalog: &Catalog) -> Self {
        Self::from_ids(split_lines(text), catalog)
    }

    /// Rebuild from an id sequence, dropping ids that are not in the catalog
    pub fn from_ids<I, S>(ids: I, catalog: &Catalog) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ids: ids
                .into_iter()
                .filter(|id| catalog.contains(id.as_ref()))
                .map(|id| id.as_ref().to_string())
                .collect(),
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.ids.get(index).map(String::as_str)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// 1-based rank of an id
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.position(id).map(|index| index + 1)
    }

    /// Canonical text form: one id per line, no trailing newline
    pub fn serialize(&self) -> String {
        self.ids.join("\n")
    }

    /// Move the row at `from` so that it ends up at rank `rank` (1-based).
    ///
    /// Ranks outside `1..=len` and a missing row leave the order unchanged.
    /// Returns whether the order changed.
    pub fn move_to_rank(&mut self, from: usize, rank: i64) -> bool {
        if from >= self.ids.len() || rank < 1 || rank > self.ids.len() as i64 {
            return false;
        }

        let to = (rank - 1) as usize;
        if to == from {
            return false;
        }

        let id = self.ids.remove(from);
        self.ids.insert(to, id);
        true
    }

    /// Place `dragged` immediately before or after `target`.
    /// Returns whether the order changed.
    pub fn place_relative(&mut self, dragged: &str, target: &str, side: DropSide) -> bool {
        if dragged == target {
            return false;
        }

        let (Some(from), Some(_)) = (self.position(dragged), self.position(target)) else {
            return false;
        };

        let before = self.ids.clone();
        let id = self.ids.remove(from);
        // Target index shifts once the dragged row is out of the way
        let target_index = self.position(target).unwrap_or(0);
        let insert_at = match side {
            DropSide::Before => target_index,
            DropSide::After => target_index + 1,
        };
        self.ids.insert(insert_at, id);

        self.ids != before
    }

    /// Row indexes whose "{id} - {name}" label contains `query`, case-insensitive.
    /// An empty query matches nothing.
    pub fn search(&self, catalog: &Catalog, query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.ids
            .iter()
            .enumerate()
            .filter(|(_, id)| {
                catalog
                    .get(id)
                    .map(|entry| entry.label().to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
            .map(|(index, _)| index)
            .collect()
    }
}

/// Parse a typed rank. Anything that is not an integer yields None.
pub fn parse_rank(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn starter_catalog() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry::new("1", "Bulbasaur"),
            CatalogEntry::new("2", "Ivysaur"),
            CatalogEntry::new("3", "Venusaur"),
            CatalogEntry::new("4", "Charmander"),
            CatalogEntry::new("5", "Charmeleon"),
        ])
    }

    fn ids(list: &PriorityList) -> Vec<&str> {
        list.ids().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_initialize_from_catalog() {
        let list = PriorityList::from_catalog(&starter_catalog());

        assert_eq!(ids(&list), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(list.rank_of("1"), Some(1));
        assert_eq!(list.rank_of("5"), Some(5));
        assert_eq!(list.serialize(), "1\n2\n3\n4\n5");
    }

    #[test]
    fn test_from_text_drops_foreign_ids() {
        let list = PriorityList::from_text("3\n99\n1\n", &starter_catalog());
        assert_eq!(ids(&list), vec!["3", "1"]);
    }

    #[test]
    fn test_move_to_rank_down_and_up() {
        let mut list = PriorityList::from_catalog(&starter_catalog());

        assert!(list.move_to_rank(0, 3));
        assert_eq!(ids(&list), vec!["2", "3", "1", "4", "5"]);

        assert!(list.move_to_rank(4, 1));
        assert_eq!(ids(&list), vec!["5", "2", "3", "1", "4"]);

        assert!(list.move_to_rank(1, 5));
        assert_eq!(ids(&list), vec!["5", "3", "1", "4", "2"]);
    }

    #[test]
    fn test_move_to_rank_out_of_range_is_noop() {
        let mut list = PriorityList::from_catalog(&starter_catalog());
        let original = list.clone();

        assert!(!list.move_to_rank(2, 0));
        assert!(!list.move_to_rank(2, -4));
        assert!(!list.move_to_rank(2, 6));
        assert!(!list.move_to_rank(9, 1));
        assert!(!list.move_to_rank(2, 3));

        assert_eq!(list, original);
    }

    #[test]
    fn test_place_relative_every_pair() {
        let catalog = starter_catalog();
        let base = PriorityList::from_catalog(&catalog);

        for dragged in base.ids() {
            for target in base.ids() {
                if dragged == target {
                    continue;
                }
                for side in [DropSide::Before, DropSide::After] {
                    let mut list = base.clone();
                    list.place_relative(dragged, target, side);

                    let d = list.position(dragged).unwrap();
                    let t = list.position(target).unwrap();
                    match side {
                        DropSide::Before => assert_eq!(d + 1, t),
                        DropSide::After => assert_eq!(t + 1, d),
                    }

                    // Everything else keeps its relative order
                    let rest: Vec<&String> = list.ids().iter().filter(|id| *id != dragged).collect();
                    let base_rest: Vec<&String> =
                        base.ids().iter().filter(|id| *id != dragged).collect();
                    assert_eq!(rest, base_rest);
                }
            }
        }
    }

    #[test]
    fn test_place_relative_on_self_or_unknown() {
        let mut list = PriorityList::from_catalog(&starter_catalog());

        assert!(!list.place_relative("2", "2", DropSide::After));
        assert!(!list.place_relative("2", "42", DropSide::After));
        assert!(!list.place_relative("2", "3", DropSide::Before));
        assert_eq!(list.serialize(), "1\n2\n3\n4\n5");
    }

    #[test]
    fn test_search_matches_id_and_name() {
        let catalog = starter_catalog();
        let list = PriorityList::from_catalog(&catalog);

        assert_eq!(list.search(&catalog, "char"), vec![3, 4]);
        assert_eq!(list.search(&catalog, "SAUR"), vec![0, 1, 2]);
        assert_eq!(list.search(&catalog, "3"), vec![2]);
        assert!(list.search(&catalog, "").is_empty());
    }

    #[test]
    fn test_parse_rank() {
        assert_eq!(parse_rank(" 12 "), Some(12));
        assert_eq!(parse_rank("-1"), Some(-1));
        assert_eq!(parse_rank("abc"), None);
        assert_eq!(parse_rank(""), None);
    }
}
