//! Client configuration read from the environment.
//!
//! | Variable             | Default                          |
//! |----------------------|----------------------------------|
//! | `FOLIO_API_BASE_URL` | `http://localhost:8000/api/v1`   |
//! | `FOLIO_DATA_DIR`     | platform data dir + `/folio`     |
//! | `FOLIO_LOCALE`       | `zh`                             |

use std::path::PathBuf;

use folio_domain::{DomainError, Locale};
use url::Url;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Errors produced while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The base URL could not be parsed.
    #[error("invalid FOLIO_API_BASE_URL {value:?}: {source}")]
    InvalidBaseUrl {
        /// The offending value.
        value: String,
        /// Parse failure.
        source: url::ParseError,
    },

    /// The base URL is not http or https.
    #[error("FOLIO_API_BASE_URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),

    /// The locale is not one of the supported ones.
    #[error("invalid FOLIO_LOCALE: {0}")]
    Locale(#[from] DomainError),

    /// No data directory was given and the platform has none.
    #[error("could not determine a data directory; set FOLIO_DATA_DIR")]
    NoDataDir,
}

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every API path is appended to, without a trailing slash.
    pub api_base_url: String,
    /// Directory holding the credential jar and the session file.
    pub data_dir: PathBuf,
    /// Locale used when no path is known yet.
    pub default_locale: Locale,
}

impl ClientConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, one variable at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("FOLIO_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let parsed = Url::parse(raw_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
            value: raw_url.clone(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let data_dir = match lookup("FOLIO_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .map(|p| p.join("folio"))
                .ok_or(ConfigError::NoDataDir)?,
        };

        let default_locale = match lookup("FOLIO_LOCALE") {
            Some(code) => code.parse()?,
            None => Locale::default(),
        };

        Ok(Self {
            api_base_url: parsed.as_str().trim_end_matches('/').to_string(),
            data_dir,
            default_locale,
        })
    }
}
