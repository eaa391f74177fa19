// UDP discovery of Topas4 devices on the local network.
//
// Probe/reply protocol: the literal text "Topas4?" is sent to a
// well-known multicast group and to the local broadcast address; every
// device answers with a JSON announcement carrying its identity and
// control base URL. Replies are collected for a bounded window and
// de-duplicated by sender GUID (a device can answer on both paths).

use std::collections::HashSet;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Error;

/// Well-known discovery port (multicast and broadcast).
pub const DISCOVERY_PORT: u16 = 7415;

/// Multicast group Topas4 devices listen on.
pub const MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 0, 0, 181);

/// Probe payload, sent verbatim.
pub const PROBE: &[u8] = b"Topas4?";

/// Protocol tag a reply must carry to be accepted.
pub const PROTOCOL_IDENTIFIER: &str = "Topas4";

/// Default discovery window.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

const MAX_DATAGRAM: usize = 4096;

/// A device announcement parsed from a discovery reply.
///
/// The result set of one discovery run holds at most one entry per
/// `sender_guid`; it is not persisted anywhere -- run discovery again
/// rather than caching addresses across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    /// Protocol tag; always [`PROTOCOL_IDENTIFIER`] after filtering.
    #[serde(rename = "Identifier")]
    pub identifier: String,

    /// Unique id of the responding instance, the de-duplication key.
    #[serde(rename = "SenderGUID")]
    pub sender_guid: Uuid,

    /// Human-assigned serial, used to select one physical unit.
    #[serde(rename = "SerialNumber")]
    pub serial_number: String,

    /// Base URL of the device's public REST control surface.
    #[serde(rename = "PublicApiRestUrl_Version0")]
    pub base_url: String,
}

/// One-shot discovery scan.
///
/// The UDP socket lives for exactly one [`run`](Discovery::run) call;
/// there is no background listener or device registry.
#[derive(Debug, Clone)]
pub struct Discovery {
    targets: Vec<SocketAddr>,
    timeout: Duration,
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            targets: vec![
                SocketAddrV4::new(MULTICAST_GROUP, DISCOVERY_PORT).into(),
                SocketAddrV4::new(Ipv4Addr::BROADCAST, DISCOVERY_PORT).into(),
            ],
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Discovery {
    /// Discovery with the protocol's default targets and window.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the discovery window.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the probe destinations.
    ///
    /// Useful for subnet-specific broadcast addresses, or to point the
    /// probe at a local responder in tests.
    pub fn targets(mut self, targets: Vec<SocketAddr>) -> Self {
        self.targets = targets;
        self
    }

    /// Run one discovery scan and return the de-duplicated device set.
    ///
    /// Always returns within roughly the configured window, devices or
    /// not. Probe sends are best-effort per destination; a hard receive
    /// error aborts the scan but still yields the devices collected so
    /// far.
    pub async fn run(&self) -> Result<Vec<DiscoveredDevice>, Error> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .map_err(Error::Bind)?;
        socket.set_broadcast(true).map_err(Error::Bind)?;

        let mut sent = 0usize;
        let mut last_failure = None;
        for target in &self.targets {
            match socket.send_to(PROBE, *target).await {
                Ok(_) => {
                    debug!(%target, "discovery probe sent");
                    sent += 1;
                }
                Err(e) => {
                    // One path failing is fine; the other may still reach the device.
                    warn!(%target, error = %e, "discovery probe send failed");
                    last_failure = Some((*target, e));
                }
            }
        }
        if sent == 0 {
            if let Some((target, source)) = last_failure {
                return Err(Error::ProbeSend { target, source });
            }
        }

        let deadline = Instant::now() + self.timeout;
        let mut devices = Vec::new();
        let mut seen = HashSet::new();
        let mut buf = [0u8; MAX_DATAGRAM];

        loop {
            let (len, from) = match tokio::time::timeout_at(deadline, socket.recv_from(&mut buf)).await {
                // Window elapsed -- the sole regular termination condition.
                Err(_) => break,
                Ok(Ok(received)) => received,
                Ok(Err(e)) => {
                    warn!(error = %e, "discovery receive failed, returning partial results");
                    break;
                }
            };

            let device: DiscoveredDevice = match serde_json::from_slice(&buf[..len]) {
                Ok(d) => d,
                Err(e) => {
                    debug!(%from, error = %e, "ignoring malformed discovery reply");
                    continue;
                }
            };
            if device.identifier != PROTOCOL_IDENTIFIER {
                debug!(%from, identifier = %device.identifier, "ignoring reply from foreign protocol");
                continue;
            }
            // First occurrence wins; duplicates arrive when a device
            // answers both the multicast and broadcast probes.
            if seen.insert(device.sender_guid) {
                devices.push(device);
            }
        }

        debug!(count = devices.len(), "discovery window closed");
        Ok(devices)
    }

    /// Run a scan and pick the device with the given serial number.
    pub async fn find_by_serial(&self, serial: &str) -> Result<Option<DiscoveredDevice>, Error> {
        let devices = self.run().await?;
        Ok(devices.into_iter().find(|d| d.serial_number == serial))
    }
}
