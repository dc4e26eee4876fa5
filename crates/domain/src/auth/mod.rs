//! Authentication domain types

mod claims;
mod types;

pub use claims::AccessClaims;
pub use types::{CredentialKind, CredentialPair, token_preview};
