//! Language model.
//!
//! The portal is bilingual: Arabic is the default (right-to-left) and English
//! is the secondary language. The configured set is validated at startup.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Language codes written right-to-left.
const RTL_LANGUAGES: &[&str] = &["ar", "fa", "he", "ur"];

/// Text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// A language the portal can render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Language code (e.g., "ar", "en").
    pub id: String,

    /// Text direction, derived from the primary subtag.
    pub direction: Direction,

    /// Whether this is the default language.
    pub is_default: bool,
}

impl Language {
    /// Build a language from its code, validating the code.
    pub fn new(id: &str, is_default: bool) -> Result<Self> {
        let id = id.trim().to_lowercase();
        validate_language_id(&id)?;

        let primary = id.split('-').next().unwrap_or_default();
        let direction = if RTL_LANGUAGES.contains(&primary) {
            Direction::Rtl
        } else {
            Direction::Ltr
        };

        Ok(Self {
            id,
            direction,
            is_default,
        })
    }

    pub fn is_rtl(&self) -> bool {
        self.direction == Direction::Rtl
    }

    /// Build the configured language list, marking `default` as the default.
    ///
    /// The default language is always present, even if missing from `ids`.
    pub fn from_config(ids: &[String], default: &str) -> Result<Vec<Self>> {
        let default = Self::new(default, true)?;
        let mut languages = vec![default.clone()];

        for id in ids {
            let lang = Self::new(id, false)?;
            if lang.id != default.id && !languages.iter().any(|l| l.id == lang.id) {
                languages.push(lang);
            }
        }

        Ok(languages)
    }
}

/// Validate that a language ID follows BCP 47 primary subtag format.
///
/// Accepts: lowercase alpha 2-3 chars, optionally followed by hyphen-separated
/// alphanumeric subtags (e.g., "ar", "en", "ar-eg").
fn validate_language_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 12 {
        anyhow::bail!("language ID must be 1-12 characters, got '{id}'");
    }

    let mut parts = id.split('-');

    match parts.next() {
        Some(primary) if (2..=3).contains(&primary.len()) => {
            if !primary.bytes().all(|b| b.is_ascii_lowercase()) {
                anyhow::bail!("language ID primary subtag must be lowercase letters, got '{id}'");
            }
        }
        _ => {
            anyhow::bail!("language ID must start with a 2-3 letter primary subtag, got '{id}'");
        }
    }

    for subtag in parts {
        if subtag.is_empty()
            || subtag.len() > 8
            || !subtag.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            anyhow::bail!(
                "language ID subtag must be 1-8 alphanumeric characters, got '{subtag}' in '{id}'"
            );
        }
    }

    Ok(())
}
