//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::access::{AccessGuard, SessionProvider};
use crate::api::{ApiClient, ApiSessionProvider};
use crate::config::Config;
use crate::labels::{ApiLabelSource, LabelService, LabelSource, LabelStore, MemoryLabelSource};
use crate::middleware::language::{
    AcceptLanguageNegotiator, LanguageNegotiator, QueryNegotiator,
};
use crate::models::Language;
use crate::navigation::Navigator;
use crate::routing::portal_routes;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,

    /// Enabled languages, default first.
    ///
    /// Frozen at startup: adding/removing languages requires a restart.
    languages: Vec<Language>,

    /// Known language codes, same order as `languages`.
    known_languages: Vec<String>,

    navigator: Navigator,

    labels: LabelService,

    /// Maps bearer tokens to principal sources.
    sessions: Arc<dyn SessionProvider>,

    /// Sorted by priority, highest first.
    language_negotiators: Vec<Arc<dyn LanguageNegotiator>>,
}

impl AppState {
    /// Create state backed by the backend API (or bundled label files when
    /// `LABELS_DIR` is set) and load the label tables.
    pub async fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url, config.access_check_timeout)
            .context("failed to create API client")?;

        let label_source: Arc<dyn LabelSource> = match &config.labels_dir {
            Some(dir) => Arc::new(
                MemoryLabelSource::load_dir(dir, &config.languages)
                    .await
                    .context("failed to load bundled labels")?,
            ),
            None => Arc::new(ApiLabelSource::new(api.clone())),
        };
        let sessions: Arc<dyn SessionProvider> = Arc::new(ApiSessionProvider::new(api));

        let state = Self::with_sources(config, label_source, sessions)?;
        let loaded = state.labels().load_all(state.languages()).await;
        info!(
            loaded,
            total = state.languages().len(),
            "label tables loaded"
        );

        Ok(state)
    }

    /// Create state from explicit sources. Label tables start empty.
    pub fn with_sources(
        config: &Config,
        label_source: Arc<dyn LabelSource>,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self> {
        let languages = Language::from_config(&config.languages, &config.default_language)
            .context("invalid language configuration")?;
        let known_languages: Vec<String> = languages.iter().map(|l| l.id.clone()).collect();
        info!(
            count = known_languages.len(),
            default = %config.default_language,
            "loaded languages"
        );

        let mut language_negotiators: Vec<Arc<dyn LanguageNegotiator>> = vec![
            Arc::new(QueryNegotiator::new(known_languages.clone())),
            Arc::new(AcceptLanguageNegotiator::new(known_languages.clone())),
        ];
        language_negotiators.sort_by_key(|n| std::cmp::Reverse(n.priority()));

        let navigator = Navigator::new(
            Arc::new(portal_routes()),
            AccessGuard::new(config.access_check_timeout),
        );
        let labels = LabelService::new(
            label_source,
            LabelStore::new(config.default_language.clone()),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config: config.clone(),
                languages,
                known_languages,
                navigator,
                labels,
                sessions,
                language_negotiators,
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn languages(&self) -> &[Language] {
        &self.inner.languages
    }

    /// Look up an enabled language by id.
    pub fn language(&self, id: &str) -> Option<&Language> {
        self.inner.languages.iter().find(|l| l.id == id)
    }

    pub fn known_languages(&self) -> &[String] {
        &self.inner.known_languages
    }

    pub fn default_language(&self) -> &str {
        &self.inner.config.default_language
    }

    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    pub fn labels(&self) -> &LabelService {
        &self.inner.labels
    }

    pub fn sessions(&self) -> &Arc<dyn SessionProvider> {
        &self.inner.sessions
    }

    pub fn language_negotiators(&self) -> &[Arc<dyn LanguageNegotiator>] {
        &self.inner.language_negotiators
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("languages", &self.inner.known_languages)
            .field("labels", &self.inner.labels)
            .finish_non_exhaustive()
    }
}
