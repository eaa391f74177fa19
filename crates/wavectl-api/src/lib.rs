// wavectl-api: Async Rust client for Topas4-protocol tunable lasers
// (UDP endpoint discovery + REST control surface).

pub mod client;
pub mod discovery;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DeviceClient;
pub use discovery::{Discovery, DiscoveredDevice};
pub use error::Error;
pub use transport::TransportConfig;
