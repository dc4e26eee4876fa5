//! Access token claim decoding.
//!
//! Access tokens are JWTs. The client never verifies the signature; it only
//! reads the payload segment to learn when the token expires and who it was
//! issued to. Anything that cannot be decoded is treated as expired.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::error::{DomainError, DomainResult};
use crate::session::Identity;

/// Claims carried in the payload segment of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessClaims {
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Subject user id (numeric or string on the wire).
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
}

impl AccessClaims {
    /// Decodes the payload segment of `token` without verifying it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedToken` if the token has no payload
    /// segment, the segment is not base64url, or the JSON lacks `exp`.
    pub fn decode(token: &str) -> DomainResult<Self> {
        let payload = token
            .split('.')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| DomainError::MalformedToken("missing payload segment".into()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| DomainError::MalformedToken(format!("invalid base64: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::MalformedToken(format!("invalid payload: {e}")))
    }

    /// Returns true if `now` is at or past the expiry claim.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp_millis() >= self.exp.saturating_mul(1000)
    }

    /// Fail-closed expiry check on a raw token string.
    ///
    /// Returns true when the token cannot be decoded.
    #[must_use]
    pub fn token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
        match Self::decode(token) {
            Ok(claims) => claims.is_expired_at(now),
            Err(_) => true,
        }
    }

    /// Builds a session identity from the claims, if they name a user.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let user_id = self.user_id.clone()?;
        Some(Identity {
            user_id,
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            ..Identity::default()
        })
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}
