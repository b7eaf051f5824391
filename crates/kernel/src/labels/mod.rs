//! Label resolution.
//!
//! Label tokens are resolved to display text through per-language tables
//! loaded from a [`LabelSource`]. Tables are reloaded after every
//! acknowledged update and swapped in atomically.

mod interpolate;
mod source;
mod store;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

pub use interpolate::interpolate;
pub use source::{ApiLabelSource, LabelSource, MemoryLabelSource};
pub use store::{LabelStore, LabelTable};

use crate::models::{LabelEntry, Language};
use crate::numerals::to_ascii_digits;
use crate::routing::Breadcrumb;

/// Loads label tables into a [`LabelStore`] and keeps them fresh.
///
/// Loads and updates of the same language are serialized, so a slow reload
/// can never overwrite a table fetched after a later update.
#[derive(Clone)]
pub struct LabelService {
    source: Arc<dyn LabelSource>,
    store: LabelStore,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl LabelService {
    pub fn new(source: Arc<dyn LabelSource>, store: LabelStore) -> Self {
        Self {
            source,
            store,
            locks: Arc::new(DashMap::new()),
        }
    }

    fn lock_for(&self, language: &str) -> Arc<Mutex<()>> {
        self.locks.entry(language.to_string()).or_default().clone()
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    /// Fetch one language from the source and swap it into the store.
    pub async fn load_language(&self, language: &str) -> Result<usize> {
        let lock = self.lock_for(language);
        let _guard = lock.lock().await;
        self.reload(language).await
    }

    /// Caller holds the language lock.
    async fn reload(&self, language: &str) -> Result<usize> {
        let entries = self.source.get_all(language).await?;
        let table = LabelTable::from_entries(entries);
        let count = table.len();
        self.store.replace(language, table);

        info!(
            language = %language,
            count = count,
            source = self.source.name(),
            "loaded labels"
        );
        Ok(count)
    }

    /// Load every language. Failures are logged and leave that language
    /// unresolved (tokens display verbatim).
    pub async fn load_all(&self, languages: &[Language]) -> usize {
        let mut loaded = 0;
        for language in languages {
            match self.load_language(&language.id).await {
                Ok(_) => loaded += 1,
                Err(e) => warn!(
                    language = %language.id,
                    error = %e,
                    "failed to load labels"
                ),
            }
        }
        loaded
    }

    /// Push edits to the source, then reload the language from it.
    pub async fn update(
        &self,
        language: &str,
        entries: &[LabelEntry],
        token: Option<&str>,
    ) -> Result<usize> {
        let lock = self.lock_for(language);
        let _guard = lock.lock().await;

        self.source.update(language, entries, token).await?;
        info!(language = %language, count = entries.len(), "label update acknowledged");
        self.reload(language).await
    }
}

impl std::fmt::Debug for LabelService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelService")
            .field("source", &self.source.name())
            .field("store", &self.store)
            .finish()
    }
}

/// A breadcrumb ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayBreadcrumb {
    pub label: String,
    pub text: String,
    pub url: String,
}

/// Resolve a trail for display in `language`.
///
/// LTR languages get ASCII digits in their parameters. RTL trails are
/// returned in display order (leaf first).
pub fn render_trail(
    breadcrumbs: &[Breadcrumb],
    store: &LabelStore,
    language: &Language,
) -> Vec<DisplayBreadcrumb> {
    let mut rendered: Vec<DisplayBreadcrumb> = breadcrumbs
        .iter()
        .map(|crumb| {
            let text = if language.is_rtl() {
                store.resolve_in(&language.id, &crumb.label, &crumb.params)
            } else {
                let params: BTreeMap<String, String> = crumb
                    .params
                    .iter()
                    .map(|(k, v)| (k.clone(), to_ascii_digits(v)))
                    .collect();
                store.resolve_in(&language.id, &crumb.label, &params)
            };

            DisplayBreadcrumb {
                label: crumb.label.clone(),
                text,
                url: crumb.url.clone(),
            }
        })
        .collect();

    if language.is_rtl() {
        rendered.reverse();
    }
    rendered
}
