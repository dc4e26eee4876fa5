//! Supported interface locales and locale-aware paths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Path of the re-authentication entry point, without locale prefix.
pub const LOGIN_PATH: &str = "/login";

/// Locales the admin front end ships translations for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Chinese (default).
    #[default]
    Zh,
    /// English.
    En,
    /// Japanese.
    Ja,
}

impl Locale {
    /// Returns all supported locales.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Zh, Self::En, Self::Ja]
    }

    /// Returns the locale code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
            Self::Ja => "ja",
        }
    }

    /// Returns the locale named by the first segment of `path`, if supported.
    ///
    /// Only an exact segment match counts: `/en/posts` is English,
    /// `/english/posts` and `/posts` have no locale.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let first = path.trim_start_matches('/').split(['/', '?', '#']).next()?;
        Self::all().iter().copied().find(|l| l.code() == first)
    }

    /// Prefixes `path` with this locale.
    #[must_use]
    pub fn localize(self, path: &str) -> String {
        format!("/{}/{}", self.code(), path.trim_start_matches('/'))
    }

    /// Re-authentication path for a user currently at `current_path`.
    ///
    /// Keeps the current locale segment when there is one.
    #[must_use]
    pub fn login_path_for(current_path: &str) -> String {
        Self::from_path(current_path)
            .map_or_else(|| LOGIN_PATH.to_string(), |l| l.localize(LOGIN_PATH))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnsupportedLocale(s.to_string()))
    }
}
