// Hand-crafted async HTTP client for the Topas4 public REST API.
//
// Base URL: advertised by discovery as PublicApiRestUrl_Version0,
// e.g. http://192.0.2.10:8004/P23894/v0/PublicAPI
// No authentication; JSON request/response bodies.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    ExpandedInteraction, FinishAfterUserActions, SetWavelengthRequest, WavelengthOutput,
};

// ── Endpoint paths (relative to the base URL) ────────────────────────

const WAVELENGTH_OUTPUT: &str = "Optical/WavelengthControl/Output";
const SET_WAVELENGTH: &str = "Optical/WavelengthControl/SetWavelength";
const EXPANDED_INTERACTIONS: &str = "Optical/WavelengthControl/ExpandedInteractions";
const FINISH_AFTER_USER_ACTIONS: &str =
    "Optical/WavelengthControl/FinishWavelengthSettingAfterUserActions";
const IS_SHUTTER_OPEN: &str = "ShutterInterlock/IsShutterOpen";
const OPEN_CLOSE_SHUTTER: &str = "ShutterInterlock/OpenCloseShutter";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for one device's REST control surface.
///
/// Each call is an independent request; the device keeps no session
/// state, and a `PUT` only acknowledges receipt of the command --
/// convergence is observed separately via status polling.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an already-resolved base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so relative
    /// endpoint paths join under it instead of replacing the last
    /// path segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The device's control base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn put<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::check_status(resp).await
    }

    /// Deserialize a success body; map everything else to typed errors.
    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Success check for writes whose response body we don't consume.
    async fn check_status(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Validate connectivity with a cheap read. Used right after
    /// construction when the base URL was supplied directly instead of
    /// coming from discovery.
    pub async fn probe(&self) -> Result<(), Error> {
        self.wavelength_output().await.map(|_| ())
    }

    /// Current wavelength plus in-flight operation status.
    pub async fn wavelength_output(&self) -> Result<WavelengthOutput, Error> {
        self.get(WAVELENGTH_OUTPUT).await
    }

    /// All tuning interactions with their wavelength ranges.
    pub async fn expanded_interactions(&self) -> Result<Vec<ExpandedInteraction>, Error> {
        self.get(EXPANDED_INTERACTIONS).await
    }

    /// Ask the device to tune to `wavelength` using the named
    /// interaction. Acknowledges receipt only; poll
    /// [`wavelength_output`](Self::wavelength_output) for completion.
    pub async fn set_wavelength(&self, interaction: &str, wavelength: f64) -> Result<(), Error> {
        self.put(
            SET_WAVELENGTH,
            &SetWavelengthRequest {
                interaction,
                wavelength,
            },
        )
        .await
    }

    /// Tell the device the operator completed the required physical
    /// actions, optionally restoring the shutter to its prior state.
    pub async fn finish_after_user_actions(&self, restore_shutter: bool) -> Result<(), Error> {
        self.put(
            FINISH_AFTER_USER_ACTIONS,
            &FinishAfterUserActions { restore_shutter },
        )
        .await
    }

    /// Whether the shutter is currently open (bare boolean body).
    pub async fn is_shutter_open(&self) -> Result<bool, Error> {
        self.get(IS_SHUTTER_OPEN).await
    }

    /// Open (`true`) or close (`false`) the shutter (bare boolean body).
    pub async fn open_close_shutter(&self, open: bool) -> Result<(), Error> {
        self.put(OPEN_CLOSE_SHUTTER, &open).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = DeviceClient::from_reqwest(
            "http://192.0.2.10:8004/P23894/v0/PublicAPI",
            reqwest::Client::new(),
        )
        .expect("valid url");
        assert_eq!(client.base_url().path(), "/P23894/v0/PublicAPI/");

        let joined = client.url(WAVELENGTH_OUTPUT).expect("join");
        assert_eq!(
            joined.as_str(),
            "http://192.0.2.10:8004/P23894/v0/PublicAPI/Optical/WavelengthControl/Output"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_idempotent() {
        let client = DeviceClient::from_reqwest("http://192.0.2.10/api/", reqwest::Client::new())
            .expect("valid url");
        assert_eq!(client.base_url().path(), "/api/");
    }
}
