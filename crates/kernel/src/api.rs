//! Client for the portal's backend REST API.
//!
//! Only the endpoints the navigation core needs: the signed-in principal and
//! the label table.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::access::{Principal, PrincipalSource, SessionProvider};
use crate::models::LabelEntry;

/// Thin wrapper over `reqwest::Client` rooted at the API base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Wire shape of `GET /auth/me`.
#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    roles: Vec<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the principal for a bearer token.
    ///
    /// 401/403 mean the token is not (or no longer) valid: `Ok(None)`.
    pub async fn current_principal(&self, token: &str) -> Result<Option<Principal>> {
        let response = self
            .http
            .get(self.url("auth/me"))
            .bearer_auth(token)
            .send()
            .await
            .context("failed to reach auth endpoint")?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!(status = %response.status(), "token rejected by backend");
                Ok(None)
            }
            _ => {
                let me: MeResponse = response
                    .error_for_status()
                    .context("auth endpoint returned an error")?
                    .json()
                    .await
                    .context("failed to decode principal")?;
                Ok(Some(Principal::new(me.permissions, me.roles)))
            }
        }
    }

    /// Fetch every label for a language.
    pub async fn labels(&self, language: &str) -> Result<Vec<LabelEntry>> {
        let entries = self
            .http
            .get(self.url("labels"))
            .query(&[("lang", language)])
            .send()
            .await
            .context("failed to reach labels endpoint")?
            .error_for_status()
            .context("labels endpoint returned an error")?
            .json::<Vec<LabelEntry>>()
            .await
            .context("failed to decode labels")?;

        Ok(entries)
    }

    /// Push label edits; returns once the backend acknowledges them.
    pub async fn update_labels(
        &self,
        language: &str,
        entries: &[LabelEntry],
        token: Option<&str>,
    ) -> Result<()> {
        let mut request = self
            .http
            .put(self.url("labels"))
            .query(&[("lang", language)])
            .json(entries);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await
            .context("failed to reach labels endpoint")?
            .error_for_status()
            .context("label update rejected")?;

        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Principal source for one request, backed by the bearer token.
pub struct BearerSession {
    api: ApiClient,
    token: Option<String>,
}

#[async_trait]
impl PrincipalSource for BearerSession {
    async fn current(&self) -> Result<Option<Principal>> {
        match &self.token {
            Some(token) => self.api.current_principal(token).await,
            None => Ok(None),
        }
    }
}

/// Builds [`BearerSession`]s for incoming requests.
#[derive(Debug, Clone)]
pub struct ApiSessionProvider {
    api: ApiClient,
}

impl ApiSessionProvider {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl SessionProvider for ApiSessionProvider {
    fn session(&self, token: Option<&str>) -> Arc<dyn PrincipalSource> {
        Arc::new(BearerSession {
            api: self.api.clone(),
            token: token.map(str::to_string),
        })
    }
}
