//! The authenticated request executor.
//!
//! Every call runs the same pipeline:
//!
//! 1. **resolve** the access token, renewing it through the
//!    [`RenewalCoordinator`] when it is missing or expired;
//! 2. **build** the outbound request (JSON defaults, bearer header, caller
//!    headers, ambient cookies);
//! 3. **send** it through the [`HttpTransport`] port;
//! 4. **classify** the response into a JSON value or a typed error.
//!
//! A non-success status is returned to the caller as [`ApiError::Status`].
//! It never triggers a renewal or a retry; only the pre-flight expiry check
//! does.

use std::sync::Arc;

use folio_domain::{ApiRequest, ApiResponse, CredentialKind, Headers, HttpMethod, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{CredentialStore, RenewalCoordinator, SessionState};
use crate::endpoints;
use crate::error::{ApiError, ApiResult};
use crate::ports::{HttpTransport, Navigator};

const JSON: &str = "application/json";

/// Connection settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Base URL every request path is appended to, e.g.
    /// `http://localhost:8000/api/v1`.
    pub api_base_url: String,
}

impl ClientSettings {
    /// Create settings for `api_base_url`.
    #[must_use]
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Authenticated client for the content API.
///
/// Cloning is cheap; clones share credentials and the renewal slot.
#[derive(Clone)]
pub struct ApiClient {
    settings: ClientSettings,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<CredentialStore>,
    renewal: RenewalCoordinator,
}

impl ApiClient {
    /// Create a client. The renewal coordinator is owned by the client and
    /// shared by its clones.
    #[must_use]
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<CredentialStore>,
        session: Arc<SessionState>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let renewal = RenewalCoordinator::new(
            Arc::clone(&transport),
            Arc::clone(&credentials),
            session,
            navigator,
            settings.url_for(endpoints::TOKEN_REFRESH),
        );
        Self {
            settings,
            transport,
            credentials,
            renewal,
        }
    }

    /// The credential store backing this client.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// The renewal coordinator used by this client.
    #[must_use]
    pub const fn renewal(&self) -> &RenewalCoordinator {
        &self.renewal
    }

    /// The connection settings.
    #[must_use]
    pub const fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Executes an authenticated request.
    ///
    /// Returns the parsed JSON body, or [`Value::Null`] for `204`, empty and
    /// non-JSON responses.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Status`] for a non-success status
    /// - [`ApiError::Transport`] if no response was received
    /// - [`ApiError::Decode`] if a JSON response cannot be parsed
    pub async fn execute(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Vec<u8>>,
        headers: Option<&Headers>,
    ) -> ApiResult<Value> {
        let token = self.resolve_credential().await;
        let request = self.build_request(path, method, body, headers, token.as_deref());
        let response = self.send(request).await?;
        Self::classify(response)
    }

    /// Executes a request without the resolve stage and without a bearer
    /// header. Used for the login and registration endpoints.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub async fn execute_anonymous(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Vec<u8>>,
    ) -> ApiResult<Value> {
        let request = self.build_request(path, method, body, None, None);
        let response = self.send(request).await?;
        Self::classify(response)
    }

    /// Stage 1: an access token to attach, if one can be had.
    pub(crate) async fn resolve_credential(&self) -> Option<String> {
        match self.credentials.get(CredentialKind::Access) {
            Some(token) if !self.credentials.is_expired(&token) => Some(token),
            stale => {
                debug!(present = stale.is_some(), "access token unusable; renewing");
                self.renewal.renew().await
            }
        }
    }

    /// Stage 2: the outbound request.
    pub(crate) fn build_request(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<Vec<u8>>,
        headers: Option<&Headers>,
        token: Option<&str>,
    ) -> ApiRequest {
        let mut request = ApiRequest::new(method, self.settings.url_for(path));
        request.headers = Headers::new()
            .with("Content-Type", JSON)
            .with("Accept", JSON);
        if let Some(token) = token {
            request.headers.set("Authorization", format!("Bearer {token}"));
        }
        if let Some(extra) = headers {
            request.headers.merge(extra);
        }
        request.body = body;
        request.include_credentials = true;
        request
    }

    /// Stage 3: hand the request to the transport.
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        debug!(
            method = %request.method,
            url = %request.url,
            authenticated = request.bearer_token().is_some(),
            "dispatching request"
        );
        let method = request.method;
        let url = request.url.clone();
        self.transport.send(request).await.map_err(|error| {
            warn!(%method, %url, %error, "request failed before a response");
            ApiError::Transport(error)
        })
    }

    /// Stage 4: turn a response into a value or an error.
    pub(crate) fn classify(response: ApiResponse) -> ApiResult<Value> {
        if !response.status.is_success() {
            debug!(status = %response.status, "request rejected");
            return Err(ApiError::Status {
                status: response.status.as_u16(),
                body: response.text(),
            });
        }

        if response.status == StatusCode::NO_CONTENT
            || response.body.is_empty()
            || !response.is_json()
        {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&response.body).map_err(ApiError::Decode)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("settings", &self.settings)
            .field("renewal", &self.renewal)
            .finish_non_exhaustive()
    }
}
