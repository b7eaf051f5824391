#![allow(clippy::unwrap_used, clippy::expect_used)]
//! HTTP tests for the navigation and label endpoints.
//!
//! Each test builds its own app on the real router, so label edits in one
//! test never leak into another.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};

mod common;
use common::{ADMIN_TOKEN, EDITOR_TOKEN, READER_TOKEN, STALLED_TOKEN, TestApp, response_json};

fn trail_texts(body: &Value) -> Vec<String> {
    body["trail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["text"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_loaded_languages() {
    let app = TestApp::new().await;
    let response = app.get("/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["labels_loaded"], json!(["ar", "en"]));
}

// =============================================================================
// Navigation
// =============================================================================

#[tokio::test]
async fn english_trail_is_root_first_with_ascii_digits() {
    let app = TestApp::new().await;
    let response = app
        .navigate("/documents/guide/view/42", None, Some("en-US,en;q=0.9"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["language"], "en");
    assert_eq!(body["direction"], "ltr");
    assert_eq!(body["outcome"]["status"], "completed");
    assert_eq!(body["outcome"]["route"], "/documents/guide/view/:id");
    assert_eq!(trail_texts(&body), vec!["Documents", "Guides", "Guide 42"]);
    assert_eq!(body["trail"][2]["url"], "/documents/guide/view/42");
}

#[tokio::test]
async fn arabic_trail_is_reversed_with_arabic_digits() {
    let app = TestApp::new().await;
    let body = response_json(app.navigate("/documents/guide/view/42", None, None).await).await;

    assert_eq!(body["language"], "ar");
    assert_eq!(body["direction"], "rtl");
    assert_eq!(
        trail_texts(&body),
        vec!["عرض الدليل ٤٢", "الأدلة", "الوثائق"]
    );
    assert_eq!(body["outcome"]["breadcrumbs"][2]["params"]["id"], "٤٢");
}

#[tokio::test]
async fn lang_query_beats_accept_language() {
    let app = TestApp::new().await;
    let response = app
        .get(
            "/api/navigation?path=%2Fdocuments&lang=en",
            None,
            Some("ar"),
        )
        .await;
    let body = response_json(response).await;
    assert_eq!(body["language"], "en");
    assert_eq!(trail_texts(&body), vec!["Documents"]);
}

#[tokio::test]
async fn reader_is_redirected_to_unauthorized() {
    let app = TestApp::new().await;
    let body = response_json(
        app.navigate("/documents/guide/edit/5", Some(READER_TOKEN), Some("en"))
            .await,
    )
    .await;

    assert_eq!(body["outcome"]["status"], "redirected");
    assert_eq!(body["outcome"]["reason"], "unauthorized");
    assert_eq!(body["outcome"]["to"], "/unauthorized");
    assert_eq!(trail_texts(&body), vec!["Unauthorized"]);
}

#[tokio::test]
async fn anonymous_user_is_redirected_to_login() {
    let app = TestApp::new().await;
    let body =
        response_json(app.navigate("/documents/guide/edit/5", None, Some("en")).await).await;

    assert_eq!(body["outcome"]["reason"], "login_required");
    assert_eq!(
        body["outcome"]["to"],
        "/login?returnUrl=%2Fdocuments%2Fguide%2Fedit%2F5"
    );
    // Missing label falls back to the token.
    assert_eq!(trail_texts(&body), vec!["LOGIN_TITLE"]);
}

#[tokio::test]
async fn editor_opens_edit_page() {
    let app = TestApp::new().await;
    let body = response_json(
        app.navigate("/documents/guide/edit/5", Some(EDITOR_TOKEN), Some("en"))
            .await,
    )
    .await;

    assert_eq!(body["outcome"]["status"], "completed");
    assert_eq!(
        trail_texts(&body),
        vec!["Documents", "Guides", "Edit guide 5"]
    );
}

#[tokio::test]
async fn editor_cannot_edit_other_document_types() {
    let app = TestApp::new().await;
    let body = response_json(
        app.navigate("/documents/news/edit/5", Some(EDITOR_TOKEN), Some("en"))
            .await,
    )
    .await;
    assert_eq!(body["outcome"]["to"], "/unauthorized");
}

#[tokio::test]
async fn stalled_session_cancels_navigation() {
    let app = TestApp::new().await;
    let body = response_json(app.navigate("/admin", Some(STALLED_TOKEN), None).await).await;

    assert_eq!(body["outcome"]["status"], "cancelled");
    assert_eq!(body["outcome"]["url"], "/admin");
    assert!(body["trail"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_enters_dashboard() {
    let app = TestApp::new().await;
    let body = response_json(app.navigate("/admin", Some(ADMIN_TOKEN), Some("en")).await).await;

    assert_eq!(body["outcome"]["status"], "completed");
    assert_eq!(trail_texts(&body), vec!["ADMIN_TITLE", "DASHBOARD_TITLE"]);
}

#[tokio::test]
async fn relative_path_is_rejected() {
    let app = TestApp::new().await;
    let response = app.get("/api/navigation?path=documents", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Labels
// =============================================================================

fn put_labels(lang: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::put(format!("/api/labels/{lang}"))
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn labels_are_served_per_language() {
    let app = TestApp::new().await;
    let body = response_json(app.get("/api/labels/en", None, None).await).await;
    assert_eq!(body["HOME_TITLE"], "Home");
    assert_eq!(body["VIEW_ROUTE.GUIDE"], "Guide {{id}}");
}

#[tokio::test]
async fn unknown_language_is_not_found() {
    let app = TestApp::new().await;
    let response = app.get("/api/labels/fr", None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn label_update_requires_rights() {
    let app = TestApp::new().await;
    let edits = json!([{"key": "HOME_TITLE", "value": "Start"}]);

    let anonymous = app.request(put_labels("en", None, &edits)).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let reader = app.request(put_labels("en", Some(READER_TOKEN), &edits)).await;
    assert_eq!(reader.status(), StatusCode::FORBIDDEN);

    let stalled = app.request(put_labels("en", Some(STALLED_TOKEN), &edits)).await;
    assert_eq!(stalled.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn label_update_refreshes_navigation_text() {
    let app = TestApp::new().await;
    let edits = json!([
        {"key": "DOCUMENTS_TITLE", "value": "Library"},
        {"key": "ADMIN_TITLE", "value": "Administration", "section": "ADMIN"}
    ]);

    let response = app.request(put_labels("en", Some(EDITOR_TOKEN), &edits)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["language"], "en");
    assert_eq!(body["count"], 7);

    let nav = response_json(app.navigate("/documents", None, Some("en")).await).await;
    assert_eq!(trail_texts(&nav), vec!["Library"]);

    // Other languages are untouched.
    let nav = response_json(app.navigate("/documents", None, Some("ar")).await).await;
    assert_eq!(trail_texts(&nav), vec!["الوثائق"]);
}

#[tokio::test]
async fn admin_role_may_edit_labels() {
    let app = TestApp::new().await;
    let edits = json!([{"key": "HOME_TITLE", "value": "Start"}]);
    let response = app.request(put_labels("en", Some(ADMIN_TOKEN), &edits)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_label_key_is_rejected() {
    let app = TestApp::new().await;
    let edits = json!([{"key": " ", "value": "x"}]);
    let response = app.request(put_labels("en", Some(EDITOR_TOKEN), &edits)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
