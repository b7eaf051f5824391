//! Navigation endpoint.
//!
//! Runs a navigation for the requesting session and returns the outcome
//! together with the display-ordered trail in the negotiated language.

use axum::{
    Extension, Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::labels::{DisplayBreadcrumb, render_trail};
use crate::middleware::{RequestSession, ResolvedLanguage};
use crate::models::Direction;
use crate::navigation::NavigationOutcome;
use crate::state::AppState;

/// Create the navigation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/navigation", get(navigate))
}

#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    #[serde(default = "default_path")]
    pub path: String,
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Serialize)]
pub struct NavigationResponse {
    pub language: String,
    pub direction: Direction,
    pub outcome: NavigationOutcome,
    /// Trail of the page finally shown; empty if none was.
    pub trail: Vec<DisplayBreadcrumb>,
}

async fn navigate(
    State(state): State<AppState>,
    Extension(ResolvedLanguage(lang)): Extension<ResolvedLanguage>,
    Extension(session): Extension<RequestSession>,
    Query(query): Query<NavigationQuery>,
) -> AppResult<Json<NavigationResponse>> {
    if !query.path.starts_with('/') {
        return Err(AppError::BadRequest("path must start with '/'".to_string()));
    }

    let language = state
        .language(&lang)
        .ok_or_else(|| AppError::BadRequest(format!("unknown language: {lang}")))?
        .clone();

    let outcome = state
        .navigator()
        .navigate(&query.path, session.principal.as_ref())
        .await;

    let shown = match &outcome {
        NavigationOutcome::Completed(end) => Some(end),
        NavigationOutcome::Redirected { end, .. } => end.as_ref(),
        NavigationOutcome::Cancelled { .. } | NavigationOutcome::NotFound { .. } => None,
    };
    let trail = shown
        .map(|end| render_trail(&end.breadcrumbs, state.labels().store(), &language))
        .unwrap_or_default();

    Ok(Json(NavigationResponse {
        language: language.id,
        direction: language.direction,
        outcome,
        trail,
    }))
}
