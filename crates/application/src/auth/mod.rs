//! Authentication core.
//!
//! This module provides:
//! - The durable credential store with fail-closed expiry checks
//! - The persisted, observable session state
//! - The single-flight renewal coordinator
//! - Login, registration, profile and logout flows

mod credential_store;
mod renewal;
mod service;
mod session;

pub use credential_store::CredentialStore;
pub use renewal::{RenewalCoordinator, RenewalOutcome};
pub use service::AuthService;
pub use session::SessionState;
