//! Principals, access requirements and the access predicate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Well-known role names.
pub mod well_known {
    pub const SUPER_ADMIN: &str = "super_admin";
    pub const ROOT_SUPER_ADMIN: &str = "root_super_admin";
}

/// Snapshot of the signed-in user's rights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    #[serde(default)]
    pub permissions: HashSet<String>,
    #[serde(default)]
    pub roles: HashSet<String>,
}

impl Principal {
    pub fn new<P, R>(permissions: P, roles: R) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// A role requirement: one role, or any of several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRequirement {
    One(String),
    AnyOf(Vec<String>),
}

impl RoleRequirement {
    pub fn any_of<I>(roles: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::AnyOf(roles.into_iter().map(Into::into).collect())
    }

    /// True if the principal holds at least one of the roles.
    pub fn is_met_by(&self, principal: &Principal) -> bool {
        match self {
            RoleRequirement::One(role) => principal.has_role(role),
            RoleRequirement::AnyOf(roles) => roles.iter().any(|r| principal.has_role(r)),
        }
    }
}

/// What a route demands of the principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_role: Option<RoleRequirement>,
}

impl AccessRequirement {
    pub fn permission(permission: impl Into<String>) -> Self {
        Self {
            required_permission: Some(permission.into()),
            required_role: None,
        }
    }

    pub fn role(role: RoleRequirement) -> Self {
        Self {
            required_permission: None,
            required_role: Some(role),
        }
    }

    /// Human-readable summary for logs and the route listing.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(permission) = &self.required_permission {
            parts.push(format!("permission '{permission}'"));
        }
        match &self.required_role {
            Some(RoleRequirement::One(role)) => parts.push(format!("role '{role}'")),
            Some(RoleRequirement::AnyOf(roles)) => {
                parts.push(format!("any role of [{}]", roles.join(", ")));
            }
            None => {}
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(" and ")
        }
    }
}

/// Evaluate a requirement against a principal.
///
/// The permission (if any) must be held AND at least one of the roles (if any)
/// must be held.
pub fn can_activate(requirement: &AccessRequirement, principal: &Principal) -> bool {
    let permission_ok = requirement
        .required_permission
        .as_deref()
        .is_none_or(|p| principal.has_permission(p));

    let role_ok = requirement
        .required_role
        .as_ref()
        .is_none_or(|r| r.is_met_by(principal));

    permission_ok && role_ok
}
