//! Login, registration, profile and logout.
//!
//! Together with the renewal coordinator these are the only writers of the
//! session state.

use std::sync::Arc;

use folio_domain::{AccessClaims, CredentialPair, HttpMethod, Identity};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::SessionState;
use crate::client::ApiClient;
use crate::endpoints;
use crate::error::{ApiError, ApiResult};

/// Profile document returned by the profile endpoint.
#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: serde_json::Value,
    #[serde(default)]
    user: ProfileUser,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    is_superuser: bool,
    #[serde(default)]
    role_name: Option<String>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ProfileUser {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
}

impl ProfileResponse {
    fn into_identity(self) -> Identity {
        let user_id = match self.id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        };
        Identity {
            user_id,
            username: self.user.username.filter(|s| !s.is_empty()),
            email: self.user.email.filter(|s| !s.is_empty()),
            full_name: self.user.full_name.filter(|s| !s.is_empty()),
            avatar: self.avatar.filter(|s| !s.is_empty()),
            is_superuser: self.is_superuser,
            role_name: self.role_name,
            permissions: self.permissions.unwrap_or_default(),
        }
    }
}

/// Account flows on top of an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
    session: Arc<SessionState>,
}

impl AuthService {
    /// Create the service.
    #[must_use]
    pub const fn new(client: Arc<ApiClient>, session: Arc<SessionState>) -> Self {
        Self { client, session }
    }

    /// Exchanges email and password for a credential pair.
    ///
    /// Stores the pair and signs the session in with the identity carried by
    /// the access token, when it carries one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] if the credentials are refused.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Option<Identity>> {
        let body = json!({ "email": email, "password": password });
        let value = self
            .client
            .execute_anonymous(endpoints::TOKEN, HttpMethod::Post, Some(encode(&body)?))
            .await?;
        let pair: CredentialPair = serde_json::from_value(value).map_err(ApiError::Decode)?;

        self.client.credentials().set(&pair)?;

        let identity = match AccessClaims::decode(&pair.access) {
            Ok(claims) => claims.identity(),
            Err(error) => {
                warn!(%error, "access token carries no readable identity");
                None
            }
        };
        if identity.is_some() {
            self.session.set_identity(identity.clone());
        }
        info!(email, "signed in");
        Ok(identity)
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] if the server refuses; its `detail`
    /// message is available through [`ApiError::detail`].
    pub async fn register(&self, email: &str, password: &str) -> ApiResult<()> {
        let body = json!({ "email": email, "password": password });
        self.client
            .execute_anonymous(endpoints::REGISTER, HttpMethod::Post, Some(encode(&body)?))
            .await?;
        info!(email, "account registered");
        Ok(())
    }

    /// Fetches the profile of `user_id` and makes it the session identity.
    ///
    /// # Errors
    ///
    /// Returns the request error unchanged; the session is left as it was.
    pub async fn fetch_profile(&self, user_id: &str) -> ApiResult<Identity> {
        let profile: ProfileResponse = self.client.get(&endpoints::profile(user_id)).await?;
        let identity = profile.into_identity();
        self.session.set_identity(Some(identity.clone()));
        Ok(identity)
    }

    /// Signs out locally: both credentials and the identity are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential jar cannot be written. The session
    /// is cleared regardless.
    pub fn logout(&self) -> ApiResult<()> {
        self.session.clear();
        self.client.credentials().clear()?;
        info!("signed out");
        Ok(())
    }

    /// The session this service writes to.
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }
}

fn encode(body: &serde_json::Value) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(ApiError::Encode)
}
