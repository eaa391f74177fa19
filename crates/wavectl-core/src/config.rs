// Facade configuration consumed by `Laser`.
//
// Produced by wavectl-config (TOML profiles) or assembled directly by
// an embedding application.

use std::time::Duration;

use crate::monitor::PollPolicy;

/// How to locate the device's control surface.
///
/// A serial number is resolved to a base URL by a discovery scan; a
/// base URL is used as-is (with a connectivity probe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEndpoint {
    /// Resolve via discovery by the device's serial number.
    Serial(String),
    /// Already-resolved control base URL.
    BaseUrl(String),
}

/// Full facade configuration.
#[derive(Debug, Clone)]
pub struct LaserConfig {
    /// HTTP per-request timeout.
    pub http_timeout: Duration,
    /// Discovery window used when resolving a serial number.
    pub discovery_timeout: Duration,
    /// Poll/convergence policy for apply-and-confirm operations.
    pub poll: PollPolicy,
    /// Verify every state-changing write by reading the value back
    /// after the settle delay. Applied uniformly to wavelength and
    /// shutter writes.
    pub verify_writes: bool,
}

impl Default for LaserConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(10),
            discovery_timeout: wavectl_api::discovery::DEFAULT_TIMEOUT,
            poll: PollPolicy::default(),
            verify_writes: true,
        }
    }
}
