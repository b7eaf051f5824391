//! Navigation-time access checks.
//!
//! Each navigation attempt reads the principal exactly once, bounded by a
//! timeout, and then evaluates every requirement on the matched chain against
//! that snapshot.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::principal::{AccessRequirement, Principal, can_activate};
use super::session::PrincipalSource;

/// Where denied navigations are sent.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Where navigations needing a signed-in user are sent.
pub const LOGIN_PATH: &str = "/login";

/// Default bound on the principal read.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a single access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    Authorized,
    Denied,
    /// The principal could not be read in time, or the read failed.
    Unknown,
}

/// Result of reading the principal for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrincipalFetch {
    Present(Principal),
    Absent,
    Unknown,
}

impl PrincipalFetch {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            PrincipalFetch::Present(principal) => Some(principal),
            _ => None,
        }
    }
}

/// Evaluates access requirements with a bounded principal read.
#[derive(Debug, Clone, Copy)]
pub struct AccessGuard {
    timeout: Duration,
}

impl AccessGuard {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read the principal once, giving up after the configured timeout.
    pub async fn fetch_principal(&self, source: &dyn PrincipalSource) -> PrincipalFetch {
        match tokio::time::timeout(self.timeout, source.current()).await {
            Ok(Ok(Some(principal))) => PrincipalFetch::Present(principal),
            Ok(Ok(None)) => PrincipalFetch::Absent,
            Ok(Err(e)) => {
                warn!(error = %e, "failed to read principal");
                PrincipalFetch::Unknown
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "timed out waiting for principal"
                );
                PrincipalFetch::Unknown
            }
        }
    }

    /// Decide a requirement against an already-fetched principal.
    ///
    /// A missing principal is a denial, not a distinct outcome.
    pub fn decide(requirement: &AccessRequirement, fetch: &PrincipalFetch) -> AccessDecision {
        match fetch {
            PrincipalFetch::Present(principal) => {
                if can_activate(requirement, principal) {
                    AccessDecision::Authorized
                } else {
                    debug!(requirement = %requirement.describe(), "principal lacks rights");
                    AccessDecision::Denied
                }
            }
            PrincipalFetch::Absent => AccessDecision::Denied,
            PrincipalFetch::Unknown => AccessDecision::Unknown,
        }
    }

    /// Fetch the principal and decide a single requirement.
    pub async fn check(
        &self,
        requirement: &AccessRequirement,
        source: &dyn PrincipalSource,
    ) -> AccessDecision {
        let fetch = self.fetch_principal(source).await;
        Self::decide(requirement, &fetch)
    }
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self::new(DEFAULT_CHECK_TIMEOUT)
    }
}
