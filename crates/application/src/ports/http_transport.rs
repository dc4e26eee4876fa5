//! HTTP transport port

use async_trait::async_trait;
use folio_domain::{ApiRequest, ApiResponse};

/// Failures that prevent a response from being received at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for sending requests.
///
/// A non-success status is a successful send; only failures to obtain a
/// response are errors here.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and reads the full response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}
