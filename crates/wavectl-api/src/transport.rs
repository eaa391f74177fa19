// Shared transport configuration for building reqwest::Client instances.
//
// The device API is plain HTTP on the local network, so this only
// centralizes timeouts and the user agent.

use std::time::Duration;

/// Transport configuration for the HTTP control client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Connect timeout, kept short -- the device is on the local subnet.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(concat!("wavectl/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}
