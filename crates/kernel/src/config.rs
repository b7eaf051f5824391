//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Base URL of the backend REST API (default: http://127.0.0.1:8000/api).
    pub api_base_url: String,

    /// Language used when nothing else matches (default: "ar").
    pub default_language: String,

    /// Enabled languages, comma-separated (default: "ar,en").
    pub languages: Vec<String>,

    /// Directory of bundled `<lang>.json` label files. When set, labels are
    /// served from memory instead of the backend API.
    pub labels_dir: Option<PathBuf>,

    /// Upper bound on the principal read during a navigation (default: 5000 ms).
    pub access_check_timeout: Duration,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string());

        let default_language = env::var("DEFAULT_LANGUAGE")
            .unwrap_or_else(|_| "ar".to_string())
            .trim()
            .to_string();

        let languages = env::var("LANGUAGES")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| vec!["ar".to_string(), "en".to_string()]);

        let labels_dir = env::var("LABELS_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let timeout_ms: u64 = env::var("ACCESS_CHECK_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .context("ACCESS_CHECK_TIMEOUT_MS must be a valid u64")?;
        if timeout_ms == 0 {
            bail!("ACCESS_CHECK_TIMEOUT_MS must be greater than zero");
        }

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            api_base_url,
            default_language,
            languages,
            labels_dir,
            access_check_timeout: Duration::from_millis(timeout_ms),
            cors_allowed_origins,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            default_language: "ar".to_string(),
            languages: vec!["ar".to_string(), "en".to_string()],
            labels_dir: None,
            access_check_timeout: Duration::from_millis(5000),
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" ar, en ,,"), vec!["ar", "en"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn default_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_language, "ar");
        assert_eq!(config.languages, vec!["ar", "en"]);
        assert_eq!(config.access_check_timeout, Duration::from_secs(5));
    }
}
