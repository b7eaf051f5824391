//! Access control for navigation.
//!
//! - [`can_activate`] is the pure predicate over a principal snapshot.
//! - [`PrincipalSource`] abstracts where that snapshot comes from.
//! - [`AccessGuard`] performs the bounded, once-per-attempt principal read.

mod guard;
mod principal;
mod session;

pub use guard::{
    AccessDecision, AccessGuard, DEFAULT_CHECK_TIMEOUT, LOGIN_PATH, PrincipalFetch,
    UNAUTHORIZED_PATH,
};
pub use principal::{AccessRequirement, Principal, RoleRequirement, can_activate, well_known};
pub use session::{PrincipalSource, SessionProvider, SessionSnapshot, SessionState};
