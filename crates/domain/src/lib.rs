//! Folio Domain - Core client types
//!
//! This crate defines the domain model for the Folio admin API client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod locale;
pub mod request;
pub mod response;
pub mod session;

pub use auth::{AccessClaims, CredentialKind, CredentialPair, token_preview};
pub use error::{DomainError, DomainResult};
pub use locale::Locale;
pub use request::{ApiRequest, Header, Headers, HttpMethod};
pub use response::{ApiResponse, StatusCode};
pub use session::Identity;
