//! `{{name}}` placeholder interpolation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
});

/// Substitute `{{name}}` placeholders from `params`.
///
/// Unknown placeholders are left in place so a missing parameter is visible
/// rather than silently blank.
pub fn interpolate(template: &str, params: &BTreeMap<String, String>) -> String {
    if params.is_empty() || !template.contains("{{") {
        return template.to_string();
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
