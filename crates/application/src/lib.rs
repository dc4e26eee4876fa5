//! Folio Application - Authenticated API client core
//!
//! This crate defines the application layer with:
//! - Port traits (transport, credential and session storage, navigation, clock)
//! - The credential store, session state and single-flight renewal coordinator
//! - The authenticated request executor and its typed verb helpers
//! - Login, registration, profile and logout flows

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use auth::{AuthService, CredentialStore, RenewalCoordinator, RenewalOutcome, SessionState};
pub use client::{ApiClient, ClientSettings};
pub use error::{ApiError, ApiResult};
pub use ports::{
    Clock, CredentialStorage, EntryOptions, HttpTransport, Navigator, SessionStorage,
    StorageError, TransportError,
};
