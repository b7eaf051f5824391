//! Bearer token session middleware.
//!
//! Reads `Authorization: Bearer <token>` and attaches a [`RequestSession`]
//! to the request. The token is not verified here; the principal is fetched
//! lazily, and only when a guarded route asks for it.

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::debug;

use crate::access::PrincipalSource;
use crate::state::AppState;

/// Session of the current request.
#[derive(Clone)]
pub struct RequestSession {
    /// Raw bearer token, forwarded to the backend on writes.
    pub token: Option<String>,
    pub principal: Arc<dyn PrincipalSource>,
}

impl std::fmt::Debug for RequestSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSession")
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Extract the bearer token from an Authorization header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware attaching a [`RequestSession`] to every request.
pub async fn attach_session(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());
    let token = bearer_token(header).map(str::to_string);

    if token.is_some() {
        debug!("bearer token present");
    }

    let principal = state.sessions().session(token.as_deref());
    request
        .extensions_mut()
        .insert(RequestSession { token, principal });

    next.run(request).await
}
