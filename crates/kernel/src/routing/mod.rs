//! Route tree, URL matching and breadcrumb derivation.
//!
//! The tree is declared once in [`table::portal_routes`] and provides:
//! - URL → activated route chain matching
//! - Breadcrumb trails derived from that chain
//! - Guard data (auth, permissions, roles) per route

mod breadcrumb;
mod matcher;
mod node;
pub mod table;

pub use breadcrumb::{
    ADMIN_USERS_PATH, Breadcrumb, MODEL_TYPE_PARAM, USER_DOCUMENT_LABEL, derive_breadcrumbs,
};
pub use matcher::{ActivatedRoute, RouteTable, split_url};
pub use node::{
    BreadcrumbError, BreadcrumbFn, BreadcrumbLabel, BreadcrumbSpec, PathSegment, RouteData,
    RouteNode, RouteParams,
};
pub use table::portal_routes;
