//! Breadcrumb derivation from the activated route chain.
//!
//! The trail is rebuilt from scratch on every completed navigation. Entries
//! are ordered root first and never repeat a label.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::matcher::ActivatedRoute;
use super::node::RouteParams;

/// Label of the per-user document breadcrumb.
pub const USER_DOCUMENT_LABEL: &str = "USER_DOCUMENT";

/// Administrative user listing.
pub const ADMIN_USERS_PATH: &str = "/admin/users";

/// Labels whose target url is forced to a fixed path.
const URL_REWRITES: &[(&str, &str)] = &[(USER_DOCUMENT_LABEL, ADMIN_USERS_PATH)];

/// Key under which a route's model type is exposed to label interpolation.
pub const MODEL_TYPE_PARAM: &str = "modelType";

/// One entry of the trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub label: String,
    pub url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Breadcrumb {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            params: BTreeMap::new(),
        }
    }
}

/// Build the breadcrumb trail for a matched chain (root first).
///
/// Computed breadcrumbs that fail are skipped and logged; the rest of the
/// trail is still produced.
pub fn derive_breadcrumbs(chain: &[ActivatedRoute<'_>]) -> Vec<Breadcrumb> {
    let mut trail: Vec<Breadcrumb> = Vec::new();
    let mut path = String::new();
    let root_params = RouteParams::new();

    for (depth, route) in chain.iter().enumerate() {
        for segment in &route.segments {
            path.push('/');
            path.push_str(&urlencoding::encode(segment));
        }

        let data = route.node.data();
        let Some(spec) = &data.breadcrumb else {
            continue;
        };

        let params = if depth == 0 { &root_params } else { &route.params };
        let mut label = match spec.resolve(params) {
            Ok(label) => label,
            Err(e) => {
                warn!(
                    route = %route.node.path(),
                    error = %e,
                    "skipping breadcrumb that failed to resolve"
                );
                continue;
            }
        };

        if let Some(model_type) = &data.model_type {
            label
                .params
                .entry(MODEL_TYPE_PARAM.to_string())
                .or_insert_with(|| model_type.clone());
        }

        if trail.iter().any(|b| b.label == label.label) {
            debug!(label = %label.label, "skipping duplicate breadcrumb");
            continue;
        }

        let url = match rewrite_for(&label.label) {
            Some(target) => target.to_string(),
            None if depth == 0 || path.is_empty() => "/".to_string(),
            None => path.clone(),
        };

        trail.push(Breadcrumb {
            label: label.label,
            url,
            params: label.params,
        });
    }

    trail
}

fn rewrite_for(label: &str) -> Option<&'static str> {
    URL_REWRITES
        .iter()
        .find(|(from, _)| *from == label)
        .map(|(_, to)| *to)
}
