//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The locale code is not one of the supported locales.
    #[error("unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// An access token could not be decoded.
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
