//! Label (interface string) entries.

use serde::{Deserialize, Serialize};

/// One row of the label table as exchanged with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Flattened token, e.g. "VIEW_ROUTE.GUIDE".
    pub key: String,

    /// Display text, may contain `{{name}}` placeholders.
    pub value: String,

    /// Admin grouping (e.g. "breadcrumbs", "forms"). Not part of the lookup key.
    #[serde(default)]
    pub section: String,
}

impl LabelEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            section: String::new(),
        }
    }

    /// Flatten a nested translation document into entries.
    ///
    /// `{"VIEW_ROUTE": {"GUIDE": "..."}}` becomes key `VIEW_ROUTE.GUIDE` with
    /// section `VIEW_ROUTE`. Top-level strings get an empty section.
    /// Non-string leaves (numbers, booleans) are stringified; nulls are skipped.
    pub fn flatten_json(document: &serde_json::Value) -> Vec<Self> {
        let mut entries = Vec::new();
        if let serde_json::Value::Object(map) = document {
            for (key, value) in map {
                flatten_into(&mut entries, key, key, value);
            }
        }
        entries
    }
}

fn flatten_into(out: &mut Vec<LabelEntry>, section: &str, key: &str, value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (child, nested) in map {
                flatten_into(out, section, &format!("{key}.{child}"), nested);
            }
        }
        serde_json::Value::Null => {}
        serde_json::Value::String(s) => out.push(LabelEntry {
            key: key.to_string(),
            value: s.clone(),
            section: section_of(section, key),
        }),
        other => out.push(LabelEntry {
            key: key.to_string(),
            value: other.to_string(),
            section: section_of(section, key),
        }),
    }
}

fn section_of(section: &str, key: &str) -> String {
    if section == key {
        String::new()
    } else {
        section.to_string()
    }
}
