//! Route descriptors.
//!
//! A [`RouteNode`] tree is declared once at startup and never mutated. Each
//! node carries its path pattern, optional breadcrumb spec, model-type tag and
//! guard data.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::access::AccessRequirement;
use crate::numerals::to_locale_digits;

/// Resolved route parameters (`:id` → "42").
pub type RouteParams = BTreeMap<String, String>;

/// A label token plus interpolation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbLabel {
    pub label: String,
    pub params: BTreeMap<String, String>,
}

impl BreadcrumbLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for BreadcrumbLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// Failure of a computed breadcrumb.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreadcrumbError {
    #[error("missing route parameter '{0}'")]
    MissingParam(String),

    #[error("invalid breadcrumb: {0}")]
    Invalid(String),
}

/// Signature of a computed breadcrumb.
pub type BreadcrumbFn =
    dyn Fn(&RouteParams) -> Result<BreadcrumbLabel, BreadcrumbError> + Send + Sync;

/// How a route names itself in the breadcrumb trail.
#[derive(Clone)]
pub enum BreadcrumbSpec {
    Literal(String),
    Computed(Arc<BreadcrumbFn>),
}

impl BreadcrumbSpec {
    pub fn literal(token: impl Into<String>) -> Self {
        Self::Literal(token.into())
    }

    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RouteParams) -> Result<BreadcrumbLabel, BreadcrumbError> + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// `token` with the `:id` parameter rendered in Arabic-Indic digits.
    pub fn with_id(token: impl Into<String>) -> Self {
        let token = token.into();
        Self::computed(move |params| {
            let id = params
                .get("id")
                .ok_or_else(|| BreadcrumbError::MissingParam("id".to_string()))?;
            Ok(BreadcrumbLabel::new(token.as_str()).with_param("id", to_locale_digits(id)))
        })
    }

    /// Evaluate against a route's parameters.
    pub fn resolve(&self, params: &RouteParams) -> Result<BreadcrumbLabel, BreadcrumbError> {
        match self {
            BreadcrumbSpec::Literal(token) => Ok(BreadcrumbLabel::new(token.as_str())),
            BreadcrumbSpec::Computed(f) => f(params),
        }
    }
}

impl std::fmt::Debug for BreadcrumbSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreadcrumbSpec::Literal(token) => f.debug_tuple("Literal").field(token).finish(),
            BreadcrumbSpec::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Static data attached to a route.
#[derive(Debug, Clone, Default)]
pub struct RouteData {
    pub breadcrumb: Option<BreadcrumbSpec>,
    pub model_type: Option<String>,
    pub access: Option<AccessRequirement>,
    /// Only signed-in users may enter; others go to the login page.
    pub requires_auth: bool,
    /// Only signed-out users may enter; others go home.
    pub guest_only: bool,
}

impl RouteData {
    /// Whether entering this route needs a principal read.
    pub fn needs_principal(&self) -> bool {
        self.requires_auth || self.guest_only || self.access.is_some()
    }
}

/// One segment of a route's path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Static(String),
    Param(String),
    /// `**`: consumes everything that remains.
    Wildcard,
}

/// A node in the route tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    path: String,
    segments: Vec<PathSegment>,
    data: RouteData,
    children: Vec<RouteNode>,
}

impl RouteNode {
    /// Create a node for `path` (e.g. "documents", "view/:id", "", "**").
    pub fn new(path: &str) -> Self {
        let path = path.trim_matches('/').to_string();
        let segments = if path == "**" {
            vec![PathSegment::Wildcard]
        } else {
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(|s| match s.strip_prefix(':') {
                    Some(name) => PathSegment::Param(name.to_string()),
                    None => PathSegment::Static(s.to_string()),
                })
                .collect()
        };

        Self {
            path,
            segments,
            data: RouteData::default(),
            children: Vec::new(),
        }
    }

    pub fn breadcrumb(mut self, token: &str) -> Self {
        self.data.breadcrumb = Some(BreadcrumbSpec::literal(token));
        self
    }

    pub fn breadcrumb_spec(mut self, spec: BreadcrumbSpec) -> Self {
        self.data.breadcrumb = Some(spec);
        self
    }

    pub fn model_type(mut self, model_type: &str) -> Self {
        self.data.model_type = Some(model_type.to_string());
        self
    }

    pub fn access(mut self, requirement: AccessRequirement) -> Self {
        self.data.access = Some(requirement);
        self
    }

    pub fn requires_auth(mut self) -> Self {
        self.data.requires_auth = true;
        self
    }

    pub fn guest_only(mut self) -> Self {
        self.data.guest_only = true;
        self
    }

    pub fn child(mut self, child: RouteNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children<I: IntoIterator<Item = RouteNode>>(mut self, children: I) -> Self {
        self.children.extend(children);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn data(&self) -> &RouteData {
        &self.data
    }

    pub fn child_nodes(&self) -> &[RouteNode] {
        &self.children
    }

    pub fn is_wildcard(&self) -> bool {
        self.segments.first() == Some(&PathSegment::Wildcard)
    }
}
