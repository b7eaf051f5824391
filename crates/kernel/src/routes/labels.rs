//! Label table endpoints.

use std::collections::BTreeMap;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde::Serialize;
use tracing::info;

use crate::access::{
    AccessGuard, AccessRequirement, Principal, PrincipalFetch, can_activate,
};
use crate::error::{AppError, AppResult};
use crate::middleware::RequestSession;
use crate::models::LabelEntry;
use crate::routing::table::{admin_roles, permission};
use crate::state::AppState;

/// Create the labels router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/labels/{lang}", get(get_labels).put(update_labels))
}

#[derive(Debug, Serialize)]
pub struct UpdateLabelsResponse {
    pub language: String,
    /// Entries in the reloaded table.
    pub count: usize,
}

/// Label editors: the label permission, or any admin role.
fn may_edit_labels(principal: &Principal) -> bool {
    can_activate(
        &AccessRequirement::permission(permission::MANAGE_LABELS),
        principal,
    ) || can_activate(&AccessRequirement::role(admin_roles()), principal)
}

async fn get_labels(
    State(state): State<AppState>,
    Path(lang): Path<String>,
) -> AppResult<Json<BTreeMap<String, String>>> {
    if state.language(&lang).is_none() {
        return Err(AppError::NotFound);
    }

    let table = state
        .labels()
        .store()
        .table(&lang)
        .map(|t| t.to_map())
        .unwrap_or_default();

    Ok(Json(table))
}

async fn update_labels(
    State(state): State<AppState>,
    Path(lang): Path<String>,
    Extension(session): Extension<RequestSession>,
    Json(entries): Json<Vec<LabelEntry>>,
) -> AppResult<Json<UpdateLabelsResponse>> {
    if state.language(&lang).is_none() {
        return Err(AppError::NotFound);
    }
    if entries.iter().any(|e| e.key.trim().is_empty()) {
        return Err(AppError::BadRequest("label key must not be empty".to_string()));
    }

    let guard = AccessGuard::new(state.config().access_check_timeout);
    match guard.fetch_principal(session.principal.as_ref()).await {
        PrincipalFetch::Present(principal) if may_edit_labels(&principal) => {}
        PrincipalFetch::Present(_) => return Err(AppError::Forbidden),
        PrincipalFetch::Absent => return Err(AppError::Unauthorized),
        PrincipalFetch::Unknown => return Err(AppError::Unavailable),
    }

    let count = state
        .labels()
        .update(&lang, &entries, session.token.as_deref())
        .await?;
    info!(language = %lang, edited = entries.len(), "labels updated");

    Ok(Json(UpdateLabelsResponse {
        language: lang,
        count,
    }))
}
