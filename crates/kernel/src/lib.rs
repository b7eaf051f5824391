//! docportal navigation kernel.
//!
//! Route tree, breadcrumb derivation, label resolution, locale numerals and
//! navigation-time access control for the bilingual documents portal. The
//! `docportal` binary serves them over HTTP.

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod labels;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod numerals;
pub mod routes;
pub mod routing;
pub mod state;

use axum::Router;

pub use config::Config;
pub use state::AppState;

/// Build the application router with per-request middleware.
///
/// Transport layers (CORS, tracing) are added by the binary.
pub fn build_router(state: AppState) -> Router {
    // Last added = first executed: session → language → routes.
    Router::new()
        .merge(routes::health::router())
        .merge(routes::navigation::router())
        .merge(routes::labels::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::negotiate_language,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::attach_session,
        ))
        .with_state(state)
}
