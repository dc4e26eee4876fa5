//! Authenticated request execution.

mod executor;
mod verbs;

pub use executor::{ApiClient, ClientSettings};
