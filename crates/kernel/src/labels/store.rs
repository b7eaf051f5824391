//! Label tables with atomic replacement.
//!
//! Each language owns one immutable [`LabelTable`] behind an `Arc`. Reloading
//! a language builds a fresh table and swaps the `Arc` in a single insert, so
//! readers see either the old table or the new one, never a mix.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;

use super::interpolate::interpolate;
use crate::models::LabelEntry;

/// Immutable token → text mapping for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    entries: HashMap<String, String>,
}

impl LabelTable {
    /// Build a table from entries. Later duplicates of a key win.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LabelEntry>,
    {
        Self {
            entries: entries.into_iter().map(|e| (e.key, e.value)).collect(),
        }
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattened projection, sorted by key.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Shared label store, cheap to clone.
#[derive(Clone)]
pub struct LabelStore {
    inner: Arc<LabelStoreInner>,
}

struct LabelStoreInner {
    tables: DashMap<String, Arc<LabelTable>>,
    default_language: String,
}

impl LabelStore {
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(LabelStoreInner {
                tables: DashMap::new(),
                default_language: default_language.into(),
            }),
        }
    }

    pub fn default_language(&self) -> &str {
        &self.inner.default_language
    }

    /// Swap in a new table for `language`.
    pub fn replace(&self, language: &str, table: LabelTable) {
        self.inner
            .tables
            .insert(language.to_string(), Arc::new(table));
    }

    /// Snapshot of the current table for `language`.
    pub fn table(&self, language: &str) -> Option<Arc<LabelTable>> {
        self.inner
            .tables
            .get(language)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Resolve in the default language.
    pub fn resolve(&self, token: &str, params: &BTreeMap<String, String>) -> String {
        self.resolve_in(&self.inner.default_language, token, params)
    }

    /// Resolve `token` against the latest table for `language`.
    ///
    /// A missing language or missing token yields the token verbatim.
    pub fn resolve_in(
        &self,
        language: &str,
        token: &str,
        params: &BTreeMap<String, String>,
    ) -> String {
        match self.table(language) {
            Some(table) => match table.get(token) {
                Some(template) => interpolate(template, params),
                None => token.to_string(),
            },
            None => token.to_string(),
        }
    }

    /// Languages that currently have a table, sorted.
    pub fn loaded_languages(&self) -> Vec<String> {
        let mut langs: Vec<String> = self
            .inner
            .tables
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        langs.sort();
        langs
    }
}

impl std::fmt::Debug for LabelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelStore")
            .field("default_language", &self.inner.default_language)
            .field("languages", &self.loaded_languages())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn store_with(language: &str, pairs: &[(&str, &str)]) -> LabelStore {
        let store = LabelStore::new("ar");
        store.replace(
            language,
            LabelTable::from_entries(pairs.iter().map(|(k, v)| LabelEntry::new(*k, *v))),
        );
        store
    }

    #[test]
    fn unknown_key_returns_token() {
        let store = store_with("ar", &[("HOME_TITLE", "الرئيسية")]);
        assert_eq!(store.resolve("UNKNOWN_KEY", &BTreeMap::new()), "UNKNOWN_KEY");
    }

    #[test]
    fn missing_language_returns_token() {
        let store = LabelStore::new("ar");
        assert_eq!(store.resolve_in("en", "HOME_TITLE", &BTreeMap::new()), "HOME_TITLE");
    }

    #[test]
    fn resolves_with_params() {
        let store = store_with("en", &[("VIEW_ROUTE.GUIDE", "Guide #{{id}}")]);
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "42".to_string());
        assert_eq!(
            store.resolve_in("en", "VIEW_ROUTE.GUIDE", &params),
            "Guide #42"
        );
    }

    #[test]
    fn replace_is_visible_to_existing_clones() {
        let store = store_with("ar", &[("HOME_TITLE", "old")]);
        let reader = store.clone();
        let before = reader.table("ar").unwrap();

        store.replace(
            "ar",
            LabelTable::from_entries([LabelEntry::new("HOME_TITLE", "new")]),
        );

        assert_eq!(reader.resolve("HOME_TITLE", &BTreeMap::new()), "new");
        // A snapshot taken before the swap is untouched.
        assert_eq!(before.get("HOME_TITLE"), Some("old"));
    }

    #[test]
    fn resolution_is_deterministic() {
        let store = store_with("ar", &[("A", "x {{n}}")]);
        let mut params = BTreeMap::new();
        params.insert("n".to_string(), "١".to_string());
        let first = store.resolve("A", &params);
        for _ in 0..10 {
            assert_eq!(store.resolve("A", &params), first);
        }
    }

    #[test]
    fn table_projection_is_sorted() {
        let table = LabelTable::from_entries([
            LabelEntry::new("B", "2"),
            LabelEntry::new("A", "1"),
            LabelEntry::new("B", "3"),
        ]);
        let map = table.to_map();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(map["B"], "3");
    }
}
