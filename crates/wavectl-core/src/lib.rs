// wavectl-core: Domain layer between wavectl-api and consumers (CLI,
// acquisition frontends). Owns the laser facade, the apply-and-confirm
// operation monitor, and the domain model.

pub mod config;
pub mod convert;
pub mod error;
pub mod laser;
pub mod model;
pub mod monitor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceEndpoint, LaserConfig};
pub use error::CoreError;
pub use laser::{Laser, resolve_endpoint};
pub use model::{Interaction, ShutterState, TuneStatus, UserPrompt};
pub use monitor::{Monitor, PollPolicy, TuneOperation, UserActionHandler};

// Re-export the discovery result type; consumers list devices without
// touching the api crate directly.
pub use wavectl_api::DiscoveredDevice;
