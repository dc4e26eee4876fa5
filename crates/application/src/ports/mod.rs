//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod clock;
mod credential_storage;
mod http_transport;
mod navigator;
mod session_storage;

pub use clock::Clock;
pub use credential_storage::{CredentialStorage, EntryOptions, StorageError};
pub use http_transport::{HttpTransport, TransportError};
pub use navigator::Navigator;
pub use session_storage::SessionStorage;
