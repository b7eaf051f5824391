#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Tests drive the REAL router and state. Only the two outer sources are
//! replaced: labels come from memory and bearer tokens map to fixed
//! sessions instead of the backend API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use docportal_kernel::access::{Principal, PrincipalSource, SessionProvider, SessionState};
use docportal_kernel::labels::MemoryLabelSource;
use docportal_kernel::models::LabelEntry;
use docportal_kernel::{AppState, Config, build_router};

/// Token of a super admin.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Token of an editor allowed to create/edit guides and manage labels.
pub const EDITOR_TOKEN: &str = "editor-token";
/// Token of a signed-in user without rights.
pub const READER_TOKEN: &str = "reader-token";
/// Token whose session never settles.
pub const STALLED_TOKEN: &str = "stalled-token";

/// Access check bound used by the test app.
pub const CHECK_TIMEOUT: Duration = Duration::from_millis(100);

/// Maps known tokens to fixed sessions; anything else is signed out.
pub struct StaticSessions {
    sessions: HashMap<String, SessionState>,
}

impl StaticSessions {
    pub fn new() -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(
            ADMIN_TOKEN.to_string(),
            SessionState::signed_in(Principal::new(Vec::<String>::new(), ["super_admin"])),
        );
        sessions.insert(
            EDITOR_TOKEN.to_string(),
            SessionState::signed_in(Principal::new(
                ["create guide", "edit guide", "manage labels"],
                ["editor"],
            )),
        );
        sessions.insert(
            READER_TOKEN.to_string(),
            SessionState::signed_in(Principal::default()),
        );
        sessions.insert(STALLED_TOKEN.to_string(), SessionState::pending());
        Self { sessions }
    }
}

impl SessionProvider for StaticSessions {
    fn session(&self, token: Option<&str>) -> Arc<dyn PrincipalSource> {
        let session = token
            .and_then(|t| self.sessions.get(t).cloned())
            .unwrap_or_else(SessionState::signed_out);
        Arc::new(session)
    }
}

pub fn label_source() -> MemoryLabelSource {
    MemoryLabelSource::new()
        .with_language(
            "ar",
            vec![
                LabelEntry::new("HOME_TITLE", "الرئيسية"),
                LabelEntry::new("DOCUMENTS_TITLE", "الوثائق"),
                LabelEntry::new("DOCUMENT_GUIDES", "الأدلة"),
                LabelEntry::new("VIEW_ROUTE.GUIDE", "عرض الدليل {{id}}"),
                LabelEntry::new("EDIT_ROUTE", "تعديل {{id}}"),
                LabelEntry::new("UNAUTHORIZED_TITLE", "غير مصرح"),
            ],
        )
        .with_language(
            "en",
            vec![
                LabelEntry::new("HOME_TITLE", "Home"),
                LabelEntry::new("DOCUMENTS_TITLE", "Documents"),
                LabelEntry::new("DOCUMENT_GUIDES", "Guides"),
                LabelEntry::new("VIEW_ROUTE.GUIDE", "Guide {{id}}"),
                LabelEntry::new("EDIT_ROUTE", "Edit {{modelType}} {{id}}"),
                LabelEntry::new("UNAUTHORIZED_TITLE", "Unauthorized"),
            ],
        )
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config {
            access_check_timeout: CHECK_TIMEOUT,
            ..Config::default()
        };

        let state = AppState::with_sources(
            &config,
            Arc::new(label_source()),
            Arc::new(StaticSessions::new()),
        )
        .expect("Failed to initialize AppState");
        state.labels().load_all(state.languages()).await;

        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET a path, optionally with a bearer token and Accept-Language.
    pub async fn get(&self, uri: &str, token: Option<&str>, lang: Option<&str>) -> Response {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(lang) = lang {
            builder = builder.header(header::ACCEPT_LANGUAGE, lang);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Navigation API call for `path`.
    pub async fn navigate(&self, path: &str, token: Option<&str>, lang: Option<&str>) -> Response {
        let uri = format!("/api/navigation?path={}", urlencoding::encode(path));
        self.get(&uri, token, lang).await
    }
}

pub async fn response_json(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap_or_else(|_| {
        let text = String::from_utf8_lossy(&body);
        panic!("Failed to parse JSON: {text}");
    })
}
