//! The portal's route declaration.

use crate::access::{AccessRequirement, RoleRequirement, well_known};

use super::breadcrumb::USER_DOCUMENT_LABEL;
use super::matcher::RouteTable;
use super::node::{BreadcrumbSpec, RouteNode};

/// Permission names checked by document and admin routes.
pub mod permission {
    pub const MANAGE_LABELS: &str = "manage labels";
    pub const VIEW_ANALYTICS: &str = "view analytics";

    pub fn create(model_type: &str) -> String {
        format!("create {model_type}")
    }

    pub fn edit(model_type: &str) -> String {
        format!("edit {model_type}")
    }
}

/// A document type served under `/documents/<slug>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentType {
    pub slug: &'static str,
    /// Suffix used by per-type labels (`VIEW_ROUTE.<KEY>`).
    pub key: &'static str,
    /// Breadcrumb label of the listing page.
    pub list_label: &'static str,
}

pub const DOCUMENT_TYPES: &[DocumentType] = &[
    DocumentType {
        slug: "guide",
        key: "GUIDE",
        list_label: "DOCUMENT_GUIDES",
    },
    DocumentType {
        slug: "news",
        key: "NEWS",
        list_label: "DOCUMENT_NEWS",
    },
    DocumentType {
        slug: "bian",
        key: "BIAN",
        list_label: "DOCUMENT_BIANS",
    },
    DocumentType {
        slug: "archive",
        key: "ARCHIVE",
        list_label: "DOCUMENT_ARCHIVES",
    },
    DocumentType {
        slug: "artifact",
        key: "ARTIFACT",
        list_label: "DOCUMENT_ARTIFACTS",
    },
    DocumentType {
        slug: "release",
        key: "RELEASE",
        list_label: "DOCUMENT_RELEASES",
    },
    DocumentType {
        slug: "media",
        key: "MEDIA",
        list_label: "DOCUMENT_MEDIA",
    },
];

/// Roles allowed into the admin panel.
pub fn admin_roles() -> RoleRequirement {
    RoleRequirement::any_of([well_known::SUPER_ADMIN, well_known::ROOT_SUPER_ADMIN])
}

/// Build the full route tree.
pub fn portal_routes() -> RouteTable {
    RouteTable::new(RouteNode::new("").children([
        RouteNode::new("").breadcrumb("HOME_TITLE"),
        RouteNode::new("login").breadcrumb("LOGIN_TITLE").guest_only(),
        RouteNode::new("unauthorized").breadcrumb("UNAUTHORIZED_TITLE"),
        RouteNode::new("contact-us").breadcrumb("CONTACT_US_TITLE"),
        RouteNode::new("join-us").breadcrumb("JOIN_US_TITLE"),
        documents_routes(),
        admin_routes(),
        RouteNode::new("**").breadcrumb("NOT_FOUND_TITLE"),
    ]))
}

fn documents_routes() -> RouteNode {
    let user_documents = RouteNode::new("user/:id")
        .breadcrumb_spec(BreadcrumbSpec::with_id(USER_DOCUMENT_LABEL))
        .requires_auth();

    RouteNode::new("documents")
        .breadcrumb("DOCUMENTS_TITLE")
        .children(DOCUMENT_TYPES.iter().map(document_type_routes))
        .child(user_documents)
}

fn document_type_routes(doc: &DocumentType) -> RouteNode {
    RouteNode::new(doc.slug)
        .breadcrumb(doc.list_label)
        .children([
            RouteNode::new(""),
            RouteNode::new("view/:id")
                .breadcrumb_spec(BreadcrumbSpec::with_id(format!("VIEW_ROUTE.{}", doc.key))),
            RouteNode::new("create")
                .breadcrumb("CREATE_ROUTE")
                .model_type(doc.slug)
                .requires_auth()
                .access(AccessRequirement::permission(permission::create(doc.slug))),
            RouteNode::new("edit/:id")
                .breadcrumb_spec(BreadcrumbSpec::with_id("EDIT_ROUTE"))
                .model_type(doc.slug)
                .requires_auth()
                .access(AccessRequirement::permission(permission::edit(doc.slug))),
        ])
}

fn admin_routes() -> RouteNode {
    RouteNode::new("admin")
        .breadcrumb("ADMIN_TITLE")
        .requires_auth()
        .access(AccessRequirement::role(admin_roles()))
        .children([
            RouteNode::new("").breadcrumb("DASHBOARD_TITLE"),
            RouteNode::new("users").breadcrumb("USERS_TITLE").children([
                RouteNode::new(""),
                RouteNode::new("view/:id")
                    .breadcrumb_spec(BreadcrumbSpec::with_id("VIEW_ROUTE.USER")),
            ]),
            RouteNode::new("contact-messages")
                .breadcrumb("CONTACT_MESSAGES_TITLE")
                .children([
                    RouteNode::new(""),
                    RouteNode::new("view/:id")
                        .breadcrumb_spec(BreadcrumbSpec::with_id("VIEW_ROUTE.CONTACT_MESSAGE")),
                ]),
            RouteNode::new("settings").breadcrumb("SITE_SETTINGS_TITLE"),
            RouteNode::new("labels")
                .breadcrumb("LABELS_TITLE")
                .access(AccessRequirement::permission(permission::MANAGE_LABELS)),
            RouteNode::new("analytics")
                .breadcrumb("ANALYTICS_TITLE")
                .access(AccessRequirement::permission(permission::VIEW_ANALYTICS)),
        ])
}
