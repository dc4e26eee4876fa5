//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpTransport` port. Requests that ask for
//! ambient credentials go through a client with a cookie store; the rest use
//! a plain client so that no cookies travel with them.

use std::time::Duration;

use async_trait::async_trait;
use folio_application::ports::{HttpTransport, TransportError};
use folio_domain::{ApiRequest, ApiResponse, Headers, HttpMethod};
use reqwest::{Client, Method, Url};

const USER_AGENT: &str = concat!("Folio/", env!("CARGO_PKG_VERSION"));

/// Transport-level ceiling for a single exchange.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport backed by `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    with_cookies: Client,
    without_cookies: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if either client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            with_cookies: Self::builder().cookie_store(true).build().map_err(build_error)?,
            without_cookies: Self::builder().build().map_err(build_error)?,
        })
    }

    fn builder() -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    const fn client_for(&self, request: &ApiRequest) -> &Client {
        if request.include_credentials {
            &self.with_cookies
        } else {
            &self.without_cookies
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout;
        }
        if error.is_connect() {
            return TransportError::ConnectionFailed(error.to_string());
        }
        if error.is_body() || error.is_decode() {
            return TransportError::Body(error.to_string());
        }
        TransportError::Other(error.to_string())
    }
}

fn build_error(error: reqwest::Error) -> TransportError {
    TransportError::Other(format!("failed to build HTTP client: {error}"))
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = Url::parse(&request.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{e}: {}", request.url)))?;

        let mut builder = self
            .client_for(&request)
            .request(Self::to_reqwest_method(request.method), url);
        for header in request.headers.iter() {
            builder = builder.header(&header.name, &header.value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?
            .to_vec();

        Ok(ApiResponse::new(status, headers, body))
    }
}
