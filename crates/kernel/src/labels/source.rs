//! Where label tables come from.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::models::LabelEntry;

/// Backing store for label tables.
#[async_trait]
pub trait LabelSource: Send + Sync {
    /// Every entry for a language.
    async fn get_all(&self, language: &str) -> Result<Vec<LabelEntry>>;

    /// Persist edits. Returning `Ok` is the acknowledgement.
    async fn update(&self, language: &str, entries: &[LabelEntry], token: Option<&str>)
    -> Result<()>;

    /// Short name for logs ("api", "memory").
    fn name(&self) -> &'static str;
}

/// Labels served by the backend API.
#[derive(Debug, Clone)]
pub struct ApiLabelSource {
    api: ApiClient,
}

impl ApiLabelSource {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl LabelSource for ApiLabelSource {
    async fn get_all(&self, language: &str) -> Result<Vec<LabelEntry>> {
        self.api.labels(language).await
    }

    async fn update(
        &self,
        language: &str,
        entries: &[LabelEntry],
        token: Option<&str>,
    ) -> Result<()> {
        self.api.update_labels(language, entries, token).await
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

/// Labels held in memory, optionally seeded from `<lang>.json` files.
#[derive(Debug, Default)]
pub struct MemoryLabelSource {
    tables: RwLock<HashMap<String, Vec<LabelEntry>>>,
}

impl MemoryLabelSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(self, language: &str, entries: Vec<LabelEntry>) -> Self {
        self.tables.write().insert(language.to_string(), entries);
        self
    }

    /// Load nested translation documents named `<lang>.json` from `dir`.
    pub async fn load_dir(dir: &Path, languages: &[String]) -> Result<Self> {
        let source = Self::new();

        for language in languages {
            let path = dir.join(format!("{language}.json"));
            if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
                debug!(path = %path.display(), "no bundled labels for language");
                continue;
            }

            let raw = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let document: serde_json::Value = serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;

            let entries = LabelEntry::flatten_json(&document);
            info!(language = %language, count = entries.len(), "loaded bundled labels");
            source.tables.write().insert(language.clone(), entries);
        }

        Ok(source)
    }
}

#[async_trait]
impl LabelSource for MemoryLabelSource {
    async fn get_all(&self, language: &str) -> Result<Vec<LabelEntry>> {
        Ok(self
            .tables
            .read()
            .get(language)
            .cloned()
            .unwrap_or_default())
    }

    /// Upsert by key.
    async fn update(
        &self,
        language: &str,
        entries: &[LabelEntry],
        _token: Option<&str>,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let table = tables.entry(language.to_string()).or_default();

        for entry in entries {
            match table.iter_mut().find(|e| e.key == entry.key) {
                Some(existing) => *existing = entry.clone(),
                None => table.push(entry.clone()),
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_update_upserts_by_key() {
        let source = MemoryLabelSource::new().with_language(
            "en",
            vec![LabelEntry::new("HOME_TITLE", "Home"), LabelEntry::new("A", "a")],
        );

        source
            .update(
                "en",
                &[LabelEntry::new("HOME_TITLE", "Start"), LabelEntry::new("B", "b")],
                None,
            )
            .await
            .unwrap();

        let entries = source.get_all("en").await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], LabelEntry::new("HOME_TITLE", "Start"));
        assert_eq!(entries[2].key, "B");
    }

    #[tokio::test]
    async fn memory_unknown_language_is_empty() {
        let source = MemoryLabelSource::new();
        assert!(source.get_all("fr").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_dir_reads_present_languages() {
        let dir = std::env::temp_dir().join(format!("docportal-labels-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("ar.json"),
            r#"{"HOME_TITLE": "الرئيسية", "VIEW_ROUTE": {"GUIDE": "دليل {{id}}"}}"#,
        )
        .await
        .unwrap();

        let source = MemoryLabelSource::load_dir(&dir, &["ar".to_string(), "en".to_string()])
            .await
            .unwrap();

        assert_eq!(source.get_all("ar").await.unwrap().len(), 2);
        assert!(source.get_all("en").await.unwrap().is_empty());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
