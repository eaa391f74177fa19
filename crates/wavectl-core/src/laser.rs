// ── Laser facade ──
//
// Thin, explicit handle over one device's REST control surface. The
// handle is a plain value owned by the caller; endpoint resolution
// (discovery) is a separate, retryable step that happens before
// construction, not hidden inside it.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

use wavectl_api::{DeviceClient, DiscoveredDevice, Discovery, TransportConfig};

use crate::config::{DeviceEndpoint, LaserConfig};
use crate::error::CoreError;
use crate::model::{Interaction, ShutterState, TuneStatus};
use crate::monitor::{Monitor, TuneOperation, UserActionHandler};

/// One exclusive lock per control base URL, process-wide.
///
/// The device has one shutter and one wavelength; two apply-and-confirm
/// sequences interleaved against the same unit would produce ambiguous
/// verification results, even if they come from two `Laser` values.
static OPERATION_LOCKS: LazyLock<DashMap<String, Arc<Mutex<()>>>> = LazyLock::new(DashMap::new);

fn operation_lock(base_url: &Url) -> Arc<Mutex<()>> {
    OPERATION_LOCKS
        .entry(base_url.as_str().to_owned())
        .or_default()
        .clone()
}

// ── Endpoint resolution ──────────────────────────────────────────────

/// Run a discovery scan with the given window.
pub async fn discover(timeout: Duration) -> Result<Vec<DiscoveredDevice>, CoreError> {
    Ok(Discovery::new().timeout(timeout).run().await?)
}

/// Resolve a configured endpoint to a control base URL.
///
/// A base URL passes through untouched; a serial number costs one
/// discovery scan.
pub async fn resolve_endpoint(
    endpoint: &DeviceEndpoint,
    discovery_timeout: Duration,
) -> Result<String, CoreError> {
    match endpoint {
        DeviceEndpoint::BaseUrl(url) => Ok(url.clone()),
        DeviceEndpoint::Serial(serial) => {
            let found = Discovery::new()
                .timeout(discovery_timeout)
                .find_by_serial(serial)
                .await?;
            found
                .map(|device| device.base_url)
                .ok_or_else(|| CoreError::DeviceNotFound {
                    serial: serial.clone(),
                })
        }
    }
}

// ── Facade ───────────────────────────────────────────────────────────

/// Handle to one tunable laser.
///
/// Reads go straight to the device on every call -- there is no cached
/// device state, so answers are always current at the cost of a
/// request per query. State-changing operations take the per-device
/// lock and (by default) verify their effect by reading the value
/// back.
pub struct Laser {
    client: DeviceClient,
    config: LaserConfig,
    lock: Arc<Mutex<()>>,
    cancel: CancellationToken,
}

impl Laser {
    /// Connect to an already-resolved control base URL.
    ///
    /// Issues one cheap read to validate that the device actually
    /// answers there before handing out the facade.
    pub async fn connect(base_url: &str, config: LaserConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.http_timeout,
            ..TransportConfig::default()
        };
        let client = DeviceClient::new(base_url, &transport)?;
        client.probe().await?;
        info!(base_url = %client.base_url(), "connected to device");

        let lock = operation_lock(client.base_url());
        Ok(Self {
            client,
            config,
            lock,
            cancel: CancellationToken::new(),
        })
    }

    /// The device's control base URL.
    pub fn base_url(&self) -> &Url {
        self.client.base_url()
    }

    /// Token that aborts any in-flight apply-and-confirm when
    /// cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current output wavelength in nanometers.
    pub async fn wavelength(&self) -> Result<f64, CoreError> {
        Ok(self.client.wavelength_output().await?.wavelength)
    }

    /// Current shutter state.
    pub async fn shutter(&self) -> Result<ShutterState, CoreError> {
        Ok(ShutterState::from_open(
            self.client.is_shutter_open().await?,
        ))
    }

    /// Status snapshot of any in-flight wavelength change.
    pub async fn tune_status(&self) -> Result<TuneStatus, CoreError> {
        Ok(self.client.wavelength_output().await?.into())
    }

    /// All tuning interactions the device offers.
    pub async fn interactions(&self) -> Result<Vec<Interaction>, CoreError> {
        Ok(self
            .client
            .expanded_interactions()
            .await?
            .into_iter()
            .map(Interaction::from)
            .collect())
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Tune to `nm`, drive the operation to convergence, and verify
    /// the read-back.
    ///
    /// With `interaction: None` the first interaction whose output
    /// range contains the target is used; with `Some(name)` that
    /// interaction is range-checked and used. `restore_shutter` asks
    /// the device to re-open the shutter after an interlock pause if
    /// it was open before. Interlock prompts go through `handler`.
    pub async fn set_wavelength<H>(
        &self,
        nm: f64,
        interaction: Option<&str>,
        restore_shutter: bool,
        handler: &H,
    ) -> Result<(), CoreError>
    where
        H: UserActionHandler,
    {
        let _guard = self.lock.lock().await;

        let interactions = self.interactions().await?;
        let chosen = match interaction {
            Some(name) => {
                let found = interactions
                    .iter()
                    .find(|i| i.name == name)
                    .ok_or_else(|| CoreError::UnknownInteraction { name: name.into() })?;
                if !found.contains(nm) {
                    return Err(CoreError::WavelengthOutOfRange {
                        nm,
                        interaction: found.name.clone(),
                        from: found.from_nm,
                        to: found.to_nm,
                    });
                }
                found
            }
            None => interactions
                .iter()
                .find(|i| i.contains(nm))
                .ok_or(CoreError::NoInteractionForWavelength { nm })?,
        };

        info!(nm, interaction = %chosen.name, "setting wavelength");
        self.client.set_wavelength(&chosen.name, nm).await?;

        let verify = self.config.verify_writes.then_some(nm);
        let monitor =
            Monitor::new(self.config.poll.clone()).with_cancellation(self.cancel.clone());
        monitor
            .apply_and_confirm(&RestTuneOperation { client: &self.client }, verify, restore_shutter, handler)
            .await
    }

    /// Open or close the shutter, verifying the read-back when
    /// `verify_writes` is on. The same settle delay and verification
    /// policy applies as for wavelength writes.
    pub async fn set_shutter(&self, state: ShutterState) -> Result<(), CoreError> {
        let _guard = self.lock.lock().await;

        info!(%state, "setting shutter");
        self.client.open_close_shutter(state.is_open()).await?;

        if !self.config.verify_writes {
            return Ok(());
        }

        tokio::time::sleep(self.config.poll.settle_delay).await;
        let actual = ShutterState::from_open(self.client.is_shutter_open().await?);
        if actual != state {
            return Err(CoreError::ShutterMismatch {
                requested: state,
                actual,
            });
        }
        debug!(%state, "shutter verified");
        Ok(())
    }
}

// ── Monitor seam over the REST client ────────────────────────────────

struct RestTuneOperation<'a> {
    client: &'a DeviceClient,
}

impl TuneOperation for RestTuneOperation<'_> {
    async fn status(&self) -> Result<TuneStatus, CoreError> {
        Ok(self.client.wavelength_output().await?.into())
    }

    async fn resume_after_user_action(&self, restore_shutter: bool) -> Result<(), CoreError> {
        Ok(self.client.finish_after_user_actions(restore_shutter).await?)
    }

    async fn read_back(&self) -> Result<f64, CoreError> {
        Ok(self.client.wavelength_output().await?.wavelength)
    }
}
