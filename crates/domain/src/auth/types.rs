//! Credential types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The two credentials held by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    /// Short-lived bearer token sent on every authenticated call.
    Access,
    /// Longer-lived token exchanged for a fresh access token.
    Renewal,
}

impl CredentialKind {
    /// Name of the durable jar entry holding this credential.
    #[must_use]
    pub const fn entry_name(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Renewal => "refresh_token",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entry_name())
    }
}

/// Access and renewal tokens issued together by the token endpoint.
///
/// The wire names follow the token endpoint (`access` / `refresh`).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// The access token.
    pub access: String,
    /// The renewal token.
    #[serde(rename = "refresh")]
    pub renewal: String,
}

impl CredentialPair {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(access: impl Into<String>, renewal: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            renewal: renewal.into(),
        }
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access", &token_preview(&self.access))
            .field("renewal", &token_preview(&self.renewal))
            .finish()
    }
}

/// Get a preview of a token (first 8 chars + ...), safe for logs.
///
/// Tokens of 8 characters or fewer are fully redacted.
#[must_use]
pub fn token_preview(token: &str) -> String {
    match token.char_indices().nth(8) {
        Some((cut, _)) => format!("{}...", &token[..cut]),
        None => "***".to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entry_names() {
        assert_eq!(CredentialKind::Access.entry_name(), "access_token");
        assert_eq!(CredentialKind::Renewal.entry_name(), "refresh_token");
        assert_eq!(CredentialKind::Renewal.to_string(), "refresh_token");
    }

    #[test]
    fn test_token_preview() {
        assert_eq!(token_preview("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(token_preview("secretsecret"), "secretse...");
        assert_eq!(token_preview("short"), "***");
        assert_eq!(token_preview("12345678"), "***");
        assert_eq!(token_preview(""), "***");
    }

    #[test]
    fn test_debug_does_not_leak_tokens() {
        let pair = CredentialPair::new("eyJhbGciOiJIUzI1NiJ9.secret", "refresh-secret-value");
        let debug = format!("{pair:?}");
        assert!(!debug.contains("secret-value"));
        assert!(debug.contains("eyJhbGci..."));
    }

    #[test]
    fn test_pair_uses_wire_names() {
        let pair: CredentialPair =
            serde_json::from_str(r#"{"access": "a", "refresh": "r"}"#).unwrap();
        assert_eq!(pair, CredentialPair::new("a", "r"));
    }
}
