//! Navigation: match, guard, derive breadcrumbs, announce.
//!
//! A navigation attempt matches the URL, reads the principal at most once,
//! runs the guards root to leaf, and on success derives the breadcrumb trail
//! and broadcasts [`NavigationEvent::Ended`]. A rejected attempt produces at
//! most one redirect; the redirect target is navigated with redirects
//! disabled.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::access::{
    AccessDecision, AccessGuard, LOGIN_PATH, PrincipalFetch, PrincipalSource, UNAUTHORIZED_PATH,
};
use crate::routing::{ActivatedRoute, Breadcrumb, RouteParams, RouteTable, derive_breadcrumbs};

/// Capacity of the navigation event channel.
const EVENT_CAPACITY: usize = 64;

/// Why a navigation was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// The route needs a signed-in user and nobody is signed in.
    LoginRequired,
    /// The principal lacks the route's permission or role.
    Unauthorized,
    /// A guest-only route was entered by a signed-in user.
    AlreadySignedIn,
}

/// Payload of a completed navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEnd {
    pub url: String,
    /// Matched route pattern, e.g. "/documents/guide/view/:id".
    pub route: String,
    pub params: RouteParams,
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Final result of [`Navigator::navigate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Completed(NavigationEnd),
    Redirected {
        from: String,
        to: String,
        reason: RedirectReason,
        /// `None` if the redirect target could not be entered either.
        end: Option<NavigationEnd>,
    },
    /// Access could not be decided (principal read failed or timed out).
    Cancelled { url: String },
    NotFound { url: String },
}

/// Events broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Started { url: String },
    Ended(NavigationEnd),
    Redirected { from: String, to: String },
    Cancelled { url: String },
    NotFound { url: String },
}

enum Attempt {
    Done(NavigationEnd),
    Redirect { to: String, reason: RedirectReason },
    Cancel,
    NotFound,
}

/// Drives navigations against the route table.
#[derive(Clone)]
pub struct Navigator {
    routes: Arc<RouteTable>,
    guard: AccessGuard,
    events: broadcast::Sender<NavigationEvent>,
}

impl Navigator {
    pub fn new(routes: Arc<RouteTable>, guard: AccessGuard) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            routes,
            guard,
            events,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: NavigationEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    /// Navigate to `url` as the principal provided by `session`.
    pub async fn navigate(&self, url: &str, session: &dyn PrincipalSource) -> NavigationOutcome {
        self.emit(NavigationEvent::Started {
            url: url.to_string(),
        });

        match self.attempt(url, session).await {
            Attempt::Done(end) => {
                self.emit(NavigationEvent::Ended(end.clone()));
                NavigationOutcome::Completed(end)
            }
            Attempt::Redirect { to, reason } => {
                info!(from = %url, to = %to, reason = ?reason, "navigation redirected");
                self.emit(NavigationEvent::Redirected {
                    from: url.to_string(),
                    to: to.clone(),
                });

                let end = match self.attempt(&to, session).await {
                    Attempt::Done(end) => {
                        self.emit(NavigationEvent::Ended(end.clone()));
                        Some(end)
                    }
                    _ => {
                        warn!(to = %to, "redirect target rejected, not redirecting again");
                        self.emit(NavigationEvent::Cancelled { url: to.clone() });
                        None
                    }
                };

                NavigationOutcome::Redirected {
                    from: url.to_string(),
                    to,
                    reason,
                    end,
                }
            }
            Attempt::Cancel => {
                self.emit(NavigationEvent::Cancelled {
                    url: url.to_string(),
                });
                NavigationOutcome::Cancelled {
                    url: url.to_string(),
                }
            }
            Attempt::NotFound => {
                self.emit(NavigationEvent::NotFound {
                    url: url.to_string(),
                });
                NavigationOutcome::NotFound {
                    url: url.to_string(),
                }
            }
        }
    }

    async fn attempt(&self, url: &str, session: &dyn PrincipalSource) -> Attempt {
        let Some(chain) = self.routes.match_url(url) else {
            return Attempt::NotFound;
        };

        let needs_principal = chain.iter().any(|r| r.node.data().needs_principal());
        if needs_principal {
            let fetch = self.guard.fetch_principal(session).await;
            if let Some(rejection) = run_guards(url, &chain, &fetch) {
                return rejection;
            }
        }

        let breadcrumbs = derive_breadcrumbs(&chain);
        let params = chain.last().map(|r| r.params.clone()).unwrap_or_default();
        debug!(url = %url, crumbs = breadcrumbs.len(), "navigation completed");

        Attempt::Done(NavigationEnd {
            url: url.to_string(),
            route: route_pattern(&chain),
            params,
            breadcrumbs,
        })
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("guard", &self.guard)
            .field("subscribers", &self.events.receiver_count())
            .finish()
    }
}

/// Evaluate guards root to leaf. Auth-stage checks on a route run before its
/// permission/role check.
fn run_guards(url: &str, chain: &[ActivatedRoute<'_>], fetch: &PrincipalFetch) -> Option<Attempt> {
    for route in chain {
        let data = route.node.data();

        if data.guest_only && matches!(fetch, PrincipalFetch::Present(_)) {
            return Some(Attempt::Redirect {
                to: "/".to_string(),
                reason: RedirectReason::AlreadySignedIn,
            });
        }

        if data.requires_auth {
            match fetch {
                PrincipalFetch::Present(_) => {}
                PrincipalFetch::Absent => {
                    return Some(Attempt::Redirect {
                        to: login_url(url),
                        reason: RedirectReason::LoginRequired,
                    });
                }
                PrincipalFetch::Unknown => return Some(Attempt::Cancel),
            }
        }

        if let Some(requirement) = &data.access {
            match AccessGuard::decide(requirement, fetch) {
                AccessDecision::Authorized => {}
                AccessDecision::Denied => {
                    return Some(Attempt::Redirect {
                        to: UNAUTHORIZED_PATH.to_string(),
                        reason: RedirectReason::Unauthorized,
                    });
                }
                AccessDecision::Unknown => return Some(Attempt::Cancel),
            }
        }
    }

    None
}

fn login_url(return_url: &str) -> String {
    format!("{LOGIN_PATH}?returnUrl={}", urlencoding::encode(return_url))
}

fn route_pattern(chain: &[ActivatedRoute<'_>]) -> String {
    let parts: Vec<&str> = chain
        .iter()
        .map(|r| r.node.path())
        .filter(|p| !p.is_empty())
        .collect();
    format!("/{}", parts.join("/"))
}
