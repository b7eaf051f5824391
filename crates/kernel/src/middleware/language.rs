//! Language negotiation middleware.
//!
//! Resolves the display language for each request using a chain of
//! negotiators. Resolution order: `lang` query parameter → Accept-Language →
//! default.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::state::AppState;

/// Query parameter that selects the language explicitly.
pub const LANG_QUERY_PARAM: &str = "lang";

/// The resolved language for the current request.
///
/// Stored in request extensions for per-request access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage(pub String);

/// Trait for language negotiation strategies.
///
/// Implementations inspect the request and return a language code if they
/// can determine the desired language. The middleware chains negotiators
/// by priority (highest first) and uses the first known match.
pub trait LanguageNegotiator: Send + Sync {
    fn negotiate(&self, request: &Request<Body>) -> Option<String>;

    /// Priority of this negotiator (higher = checked first).
    fn priority(&self) -> i32;
}

/// Negotiates language from the `lang` query parameter (`?lang=en`).
pub struct QueryNegotiator {
    known_languages: HashSet<String>,
}

impl QueryNegotiator {
    pub fn new(known_languages: Vec<String>) -> Self {
        Self {
            known_languages: known_languages.into_iter().collect(),
        }
    }

    fn lang_param(query: &str) -> Option<String> {
        query.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == LANG_QUERY_PARAM).then(|| {
                urlencoding::decode(value)
                    .map(|v| v.trim().to_lowercase())
                    .unwrap_or_default()
            })
        })
    }
}

impl LanguageNegotiator for QueryNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        let lang = Self::lang_param(request.uri().query()?)?;
        self.known_languages.contains(&lang).then_some(lang)
    }

    fn priority(&self) -> i32 {
        100
    }
}

/// Negotiates language from the Accept-Language HTTP header.
///
/// Parses quality values and returns the highest-quality language that
/// matches a known language.
pub struct AcceptLanguageNegotiator {
    known_languages: HashSet<String>,
}

impl AcceptLanguageNegotiator {
    pub fn new(known_languages: Vec<String>) -> Self {
        Self {
            known_languages: known_languages.into_iter().collect(),
        }
    }

    /// Parse an Accept-Language value into (language, quality) pairs, sorted
    /// by quality descending. Ties keep header order. Entries with q=0 mean
    /// "not acceptable" and are dropped.
    fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
        let mut langs: Vec<(String, f32)> = header
            .split(',')
            .filter_map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    return None;
                }

                let mut segments = part.split(';');
                let lang = segments.next()?.trim().to_lowercase();

                let quality = segments
                    .find_map(|s| {
                        s.trim()
                            .strip_prefix("q=")
                            .and_then(|q| q.trim().parse::<f32>().ok())
                    })
                    .unwrap_or(1.0)
                    .clamp(0.0, 1.0);

                (quality > 0.0).then_some((lang, quality))
            })
            .collect();

        langs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        langs
    }
}

impl LanguageNegotiator for AcceptLanguageNegotiator {
    fn negotiate(&self, request: &Request<Body>) -> Option<String> {
        let header = request.headers().get("accept-language")?.to_str().ok()?;

        for (lang, _quality) in Self::parse_accept_language(header) {
            if self.known_languages.contains(&lang) {
                return Some(lang);
            }
            // "ar-EG" → "ar"
            if let Some(primary) = lang.split('-').next()
                && self.known_languages.contains(primary)
            {
                return Some(primary.to_string());
            }
        }

        None
    }

    fn priority(&self) -> i32 {
        50
    }
}

/// Middleware storing a [`ResolvedLanguage`] in request extensions.
pub async fn negotiate_language(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let language = select_language(
        state.known_languages(),
        state.language_negotiators(),
        &request,
        state.default_language(),
    );

    request.extensions_mut().insert(ResolvedLanguage(language));
    next.run(request).await
}

/// Select the active language (sync, testable).
fn select_language(
    known_languages: &[String],
    negotiators: &[Arc<dyn LanguageNegotiator>],
    request: &Request<Body>,
    default_language: &str,
) -> String {
    for negotiator in negotiators {
        if let Some(lang) = negotiator.negotiate(request) {
            if known_languages.iter().any(|k| k == &lang) {
                return lang;
            }
            tracing::warn!(
                negotiator_language = %lang,
                "negotiator returned unknown language, ignoring"
            );
        }
    }

    default_language.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn known() -> Vec<String> {
        vec!["ar".to_string(), "en".to_string()]
    }

    fn negotiators() -> Vec<Arc<dyn LanguageNegotiator>> {
        let mut negotiators: Vec<Arc<dyn LanguageNegotiator>> = vec![
            Arc::new(AcceptLanguageNegotiator::new(known())),
            Arc::new(QueryNegotiator::new(known())),
        ];
        negotiators.sort_by_key(|n| std::cmp::Reverse(n.priority()));
        negotiators
    }

    fn request(uri: &str, accept: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(accept) = accept {
            builder = builder.header("accept-language", accept);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn query_param_is_read() {
        assert_eq!(
            QueryNegotiator::lang_param("path=%2Fadmin&lang=EN"),
            Some("en".to_string())
        );
        assert_eq!(QueryNegotiator::lang_param("path=/"), None);
    }

    #[test]
    fn query_unknown_language_is_ignored() {
        let negotiator = QueryNegotiator::new(known());
        assert_eq!(negotiator.negotiate(&request("/x?lang=fr", None)), None);
    }

    #[test]
    fn accept_language_parses_quality_values() {
        let parsed = AcceptLanguageNegotiator::parse_accept_language("fr;q=0.9, en;q=1.0, ar;q=0.5");
        let order: Vec<_> = parsed.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(order, vec!["en", "fr", "ar"]);
    }

    #[test]
    fn accept_language_quality_is_clamped() {
        let parsed = AcceptLanguageNegotiator::parse_accept_language("en;q=1.5, ar;q=-0.5");
        assert_eq!(parsed, vec![("en".to_string(), 1.0)]);
    }

    #[test]
    fn zero_quality_language_is_never_chosen() {
        let negotiator = AcceptLanguageNegotiator::new(known());
        assert_eq!(negotiator.negotiate(&request("/", Some("en;q=0"))), None);

        let req = request("/", Some("en;q=0, ar;q=0.5"));
        assert_eq!(negotiator.negotiate(&req), Some("ar".to_string()));

        let req = request("/", Some("en;q=0.0"));
        assert_eq!(select_language(&known(), &negotiators(), &req, "ar"), "ar");
    }

    #[test]
    fn accept_language_matches_primary_subtag() {
        let negotiator = AcceptLanguageNegotiator::new(known());
        let req = request("/", Some("de, ar-EG;q=0.8"));
        assert_eq!(negotiator.negotiate(&req), Some("ar".to_string()));
    }

    #[test]
    fn query_beats_accept_language() {
        let req = request("/?lang=en", Some("ar"));
        assert_eq!(select_language(&known(), &negotiators(), &req, "ar"), "en");
    }

    #[test]
    fn accept_language_beats_default() {
        let req = request("/", Some("en-US"));
        assert_eq!(select_language(&known(), &negotiators(), &req, "ar"), "en");
    }

    #[test]
    fn falls_back_to_default() {
        let req = request("/", Some("ja"));
        assert_eq!(select_language(&known(), &negotiators(), &req, "ar"), "ar");
    }
}
