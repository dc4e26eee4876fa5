//! Paths of the API endpoints the client core talks to directly.

/// Exchanges email and password for a credential pair.
pub const TOKEN: &str = "/user/token/";

/// Exchanges a renewal token for a fresh access token.
pub const TOKEN_REFRESH: &str = "/user/token/refresh/";

/// Creates an account.
pub const REGISTER: &str = "/user/register/";

/// Profile of one user.
#[must_use]
pub fn profile(user_id: &str) -> String {
    format!("/user/profile/{user_id}/")
}
