//! Authenticated identity held by the session.

use serde::{Deserialize, Serialize};

/// The signed-in user as the admin front end sees it.
///
/// Holds only display and permission data. Raw credentials never live here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identity {
    /// User id as issued by the API.
    pub user_id: String,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Whether the user may manage everything.
    #[serde(default)]
    pub is_superuser: bool,
    /// Name of the assigned role, if any.
    #[serde(default)]
    pub role_name: Option<String>,
    /// Granted permission codes.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Identity {
    /// Creates an identity with only the user id set.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Set the username.
    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the superuser flag.
    #[must_use]
    pub const fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }

    /// Returns true if the user is a superuser or holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_superuser || self.permissions.iter().any(|p| p == permission)
    }

    /// Best label for display: full name, then username, then email, then id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or(&self.user_id)
    }
}
