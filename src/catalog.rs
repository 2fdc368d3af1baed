// 📚 Catalog - canonical set of entity ids and display names
// Loaded once at startup; everything else is checked against it.

use crate::errors::CatalogError;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Released-pokemon mapping used when no other source is configured
pub const DEFAULT_CATALOG_URL: &str = "https://pogoapi.net/api/v1/released_pokemon.json";

/// Sprite host; entries only expose the URL, nothing here downloads it
pub const IMAGE_HOST: &str = "https://images.gameinfo.io/pokemon-trimmed/60";

// ============================================================================
// CATALOG ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// "{id} - {name}", the row label and the search haystack
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }

    pub fn image_url(&self) -> String {
        format!("{}/p{}.webp", IMAGE_HOST, self.id)
    }
}

/// Shape of one value in the remote mapping. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    name: String,
}

// ============================================================================
// CATALOG
// ============================================================================

/// Immutable id → name mapping with a fixed iteration order.
///
/// Iteration order: integer-like ids ascending by value, then every other id
/// lexicographically. The order the source returned the mapping in does not
/// matter.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build from entries in any order. A repeated id keeps its first name.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut seen: HashMap<String, CatalogEntry> = HashMap::new();
        for entry in entries {
            seen.entry(entry.id.clone()).or_insert(entry);
        }

        let mut entries: Vec<CatalogEntry> = seen.into_values().collect();
        entries.sort_by(|a, b| catalog_order(&a.id, &b.id));

        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id.clone(), i))
            .collect();

        Self { entries, index }
    }

    /// Parse the remote payload: a JSON object keyed by id whose values carry
    /// at least a `name`.
    pub fn from_json(payload: &str) -> Result<Self, CatalogError> {
        let raw: HashMap<String, RawEntry> = serde_json::from_str(payload)?;
        if raw.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self::from_entries(
            raw.into_iter()
                .map(|(id, entry)| CatalogEntry::new(id, entry.name)),
        ))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|&i| &self.entries[i])
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }

    /// Ids in catalog iteration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }
}

fn catalog_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// ============================================================================
// LOADERS
// ============================================================================

pub fn load_catalog_file(path: &Path) -> Result<Catalog, CatalogError> {
    let payload = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = Catalog::from_json(&payload)?;
    info!(path = %path.display(), entries = catalog.len(), "catalog loaded from file");
    Ok(catalog)
}

/// Fetch the catalog once. No retry: the caller surfaces the failure.
#[cfg(feature = "client")]
pub fn fetch_catalog(url: &str) -> Result<Catalog, CatalogError> {
    let fetch_error = |reason: String| CatalogError::Fetch {
        url: url.to_string(),
        reason,
    };

    let mut response = ureq::get(url)
        .call()
        .map_err(|err| fetch_error(err.to_string()))?;
    let payload = response
        .body_mut()
        .read_to_string()
        .map_err(|err| fetch_error(err.to_string()))?;

    let catalog = Catalog::from_json(&payload)?;
    info!(url, entries = catalog.len(), "catalog fetched");
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_orders_numeric_ids_by_value() {
        let payload = r#"{
            "10": {"id": 10, "name": "Caterpie", "form": "Normal"},
            "2": {"id": 2, "name": "Ivysaur"},
            "1": {"id": 1, "name": "Bulbasaur"},
            "unown_a": {"name": "Unown A"}
        }"#;

        let catalog = Catalog::from_json(payload).unwrap();
        let ids: Vec<&str> = catalog.ids().collect();

        assert_eq!(ids, vec!["1", "2", "10", "unown_a"]);
        assert_eq!(catalog.name("10"), Some("Caterpie"));
        assert!(catalog.contains("unown_a"));
        assert!(!catalog.contains("3"));
    }

    #[test]
    fn test_from_json_rejects_bad_payloads() {
        assert!(matches!(Catalog::from_json("[1, 2]"), Err(CatalogError::Parse(_))));
        assert!(matches!(
            Catalog::from_json(r#"{"1": {"id": 1}}"#),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(Catalog::from_json("{}"), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_duplicate_ids_keep_first_entry() {
        let catalog = Catalog::from_entries(vec![
            CatalogEntry::new("1", "Bulbasaur"),
            CatalogEntry::new("1", "Impostor"),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.name("1"), Some("Bulbasaur"));
    }

    #[test]
    fn test_entry_label_and_image() {
        let entry = CatalogEntry::new("25", "Pikachu");
        assert_eq!(entry.label(), "25 - Pikachu");
        assert_eq!(
            entry.image_url(),
            "https://images.gameinfo.io/pokemon-trimmed/60/p25.webp"
        );
    }

    #[test]
    fn test_missing_catalog_file() {
        let result = load_catalog_file(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(result, Err(CatalogError::Read { .. })));
    }
}
