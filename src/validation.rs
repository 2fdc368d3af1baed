// ⚖️ Validator - compare the free-text list against the catalog
//
// Three independent, non-exclusive discrepancy sets:
//   missing   = catalog ids absent from the text
//   extra     = text lines that are not catalog ids
//   duplicate = text lines occurring more than once
//
// Any discrepancy blocks rebuilding the visual list; Fix repairs all three.

use crate::catalog::Catalog;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Split free text into candidate id lines. The whole text is trimmed first,
/// individual lines are compared verbatim. Empty text yields one empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.trim().split('\n').collect()
}

// ============================================================================
// VALIDATION REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Catalog ids not present in the text, catalog order
    pub missing: Vec<String>,

    /// Lines that are not catalog ids, text order, once per occurrence
    pub extra: Vec<String>,

    /// Lines seen more than once, first-seen order, once each
    pub duplicate: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty() && self.duplicate.is_empty()
    }

    /// Banner text, one line per non-empty set
    pub fn banner_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.missing.is_empty() {
            lines.push(format!("Missing IDs: {}", self.missing.join(", ")));
        }
        if !self.extra.is_empty() {
            lines.push(format!("Extra IDs: {}", self.extra.join(", ")));
        }
        if !self.duplicate.is_empty() {
            lines.push(format!("Duplicate IDs: {}", self.duplicate.join(", ")));
        }
        lines
    }

    pub fn summary(&self) -> String {
        format!(
            "{} missing, {} extra, {} duplicate",
            self.missing.len(),
            self.extra.len(),
            self.duplicate.len()
        )
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct Validator<'c> {
    catalog: &'c Catalog,
}

impl<'c> Validator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Validator { catalog }
    }

    pub fn validate(&self, text: &str) -> ValidationReport {
        let lines = split_lines(text);
        let line_set: HashSet<&str> = lines.iter().copied().collect();

        let missing = self
            .catalog
            .ids()
            .filter(|id| !line_set.contains(id))
            .map(str::to_string)
            .collect();

        let extra = lines
            .iter()
            .filter(|line| !self.catalog.contains(line))
            .map(|line| line.to_string())
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();
        for line in &lines {
            let count = counts.entry(line).or_insert(0);
            if *count == 0 {
                first_seen.push(line);
            }
            *count += 1;
        }
        let duplicate = first_seen
            .into_iter()
            .filter(|line| counts[line] > 1)
            .map(str::to_string)
            .collect();

        ValidationReport {
            missing,
            extra,
            duplicate,
        }
    }

    /// Repair arbitrary text into a permutation of the catalog.
    ///
    /// Valid lines are kept in text order, first occurrence wins; duplicates
    /// and foreign ids are dropped; unused catalog ids are appended in
    /// catalog order.
    pub fn fix(&self, text: &str) -> Vec<String> {
        let mut used: HashSet<&str> = HashSet::new();
        let mut fixed = Vec::with_capacity(self.catalog.len());

        for line in split_lines(text) {
            if self.catalog.contains(line) && used.insert(line) {
                fixed.push(line.to_string());
            }
        }

        for id in self.catalog.ids() {
            if !used.contains(id) {
                fixed.push(id.to_string());
            }
        }

        fixed
    }
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
        ])
    }

    fn permutations(items: &[&str]) -> Vec<Vec<String>> {
        if items.len() <= 1 {
            return vec![items.iter().map(|s| s.to_string()).collect()];
        }
        let mut result = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.to_string());
                result.push(tail);
            }
        }
        result
    }

    fn assert_is_permutation(ids: &[String], catalog: &Catalog) {
        assert_eq!(ids.len(), catalog.len());
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), catalog.len());
        assert!(ids.iter().all(|id| catalog.contains(id)));
    }

    #[test]
    fn test_every_permutation_validates_clean() {
        let catalog = Catalog::from_entries(
            ["1", "2", "3", "4", "25"]
                .iter()
                .map(|id| CatalogEntry::new(*id, format!("Mon {}", id))),
        );
        let validator = Validator::new(&catalog);

        for perm in permutations(&["1", "2", "3", "4", "25"]) {
            let report = validator.validate(&perm.join("\n"));
            assert!(report.is_valid(), "{:?} -> {}", perm, report.summary());
            assert!(report.banner_lines().is_empty());
        }
    }

    #[test]
    fn test_trailing_newline_is_ignored() {
        let catalog = starter_catalog();
        let report = Validator::new(&catalog).validate("1\n2\n3\n");
        assert!(report.is_valid());
    }

    #[test]
    fn test_classifies_missing_extra_duplicate() {
        let catalog = starter_catalog();
        let report = Validator::new(&catalog).validate("3\n1\n1\n5\n5");

        assert_eq!(report.missing, vec!["2"]);
        assert_eq!(report.extra, vec!["5", "5"]);
        assert_eq!(report.duplicate, vec!["1", "5"]);
        assert_eq!(
            report.banner_lines(),
            vec![
                "Missing IDs: 2".to_string(),
                "Extra IDs: 5, 5".to_string(),
                "Duplicate IDs: 1, 5".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_text_reports_everything_missing() {
        let catalog = starter_catalog();
        let report = Validator::new(&catalog).validate("");

        assert_eq!(report.missing, vec!["1", "2", "3"]);
        assert_eq!(report.extra, vec![""]);
        assert!(report.duplicate.is_empty());
    }

    #[test]
    fn test_fix_scenario() {
        let catalog = starter_catalog();
        let fixed = Validator::new(&catalog).fix("3\n1\n1\n5");
        assert_eq!(fixed, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_fix_always_yields_permutation() {
        let catalog = starter_catalog();
        let validator = Validator::new(&catalog);

        for text in ["", "1\n1\n1\n1", "x\ny\nz", "\n\n\n", "2", "3\n2\n1", " 1\n2 "] {
            let fixed = validator.fix(text);
            assert_is_permutation(&fixed, &catalog);
            assert!(validator.validate(&fixed.join("\n")).is_valid());
        }
    }

    #[test]
    fn test_fix_is_idempotent() {
        let catalog = starter_catalog();
        let validator = Validator::new(&catalog);

        for text in ["", "3\n1\n1\n5", "2\nfoo\n2", "1\n2\n3"] {
            let once = validator.fix(text).join("\n");
            let twice = validator.fix(&once).join("\n");
            assert_eq!(once, twice);
        }
    }
}
