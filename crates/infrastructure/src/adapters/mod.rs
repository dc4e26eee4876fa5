//! Port adapters backed by the network, the system clock and the log.

mod reqwest_transport;
mod system_clock;
mod tracing_navigator;

pub use reqwest_transport::ReqwestTransport;
pub use system_clock::SystemClock;
pub use tracing_navigator::TracingNavigator;
