//! Outbound request specification

use serde::{Deserialize, Serialize};

use super::{Headers, HttpMethod};

/// A fully built request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Request headers.
    pub headers: Headers,
    /// Encoded request body.
    pub body: Option<Vec<u8>>,
    /// Whether ambient cookie credentials accompany the request.
    pub include_credentials: bool,
}

impl ApiRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            include_credentials: true,
        }
    }

    /// Attaches a body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the bearer token carried by the `Authorization` header, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get("Authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bearer_token() {
        let mut request = ApiRequest::new(HttpMethod::Get, "http://api/x");
        assert_eq!(request.bearer_token(), None);
        request.headers.set("Authorization", "Bearer abc");
        assert_eq!(request.bearer_token(), Some("abc"));
        assert!(request.include_credentials);
    }
}
