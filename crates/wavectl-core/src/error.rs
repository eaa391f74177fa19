// ── Core error types ──
//
// User-facing errors from wavectl-core. Consumers never see raw
// reqwest errors or HTTP bodies directly; the From<wavectl_api::Error>
// impl translates the transport layer into domain-appropriate
// variants. "Device never finished" (Timeout) and "device finished but
// reports a different value" (ValueMismatch/ShutterMismatch) stay
// distinct -- they call for different remediation.

use std::time::Duration;

use thiserror::Error;

use crate::model::ShutterState;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection / resolution errors ───────────────────────────────
    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("No device with serial number '{serial}' answered discovery")]
    DeviceNotFound { serial: String },

    // ── Tuning validation errors ─────────────────────────────────────
    #[error("No tuning interaction covers {nm} nm")]
    NoInteractionForWavelength { nm: f64 },

    #[error("Unknown interaction '{name}'")]
    UnknownInteraction { name: String },

    #[error("{nm} nm is outside the '{interaction}' range ({from} - {to} nm)")]
    WavelengthOutOfRange {
        nm: f64,
        interaction: String,
        from: f64,
        to: f64,
    },

    // ── Operation errors ─────────────────────────────────────────────
    /// The device never reported completion within the monitor's bound.
    #[error("Operation did not converge within {limit:?}")]
    Timeout { limit: Duration },

    /// The device accepted the request and reported completion, but the
    /// read-back value differs from what was requested.
    #[error("Device reports {actual} nm after a request for {requested} nm")]
    ValueMismatch { requested: f64, actual: f64 },

    /// Shutter flavor of the read-back mismatch.
    #[error("Shutter reads {actual} after a request to set it {requested}")]
    ShutterMismatch {
        requested: ShutterState,
        actual: ShutterState,
    },

    /// The operator did not acknowledge the interlock prompt in time.
    #[error("No operator acknowledgment within {limit:?}")]
    UserActionTimeout { limit: Duration },

    /// The operator declined or the acknowledgment channel was dropped.
    #[error("Operator abandoned the user-action prompt")]
    UserActionAbandoned,

    /// The operation was cancelled from outside.
    #[error("Operation cancelled")]
    Cancelled,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Device API error: {0}")]
    Api(#[source] wavectl_api::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` when re-invoking the same operation is a
    /// reasonable remediation (as opposed to inspecting the hardware).
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Cancelled | Self::UserActionTimeout { .. } => true,
            Self::Api(e) => e.is_transient(),
            _ => false,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wavectl_api::Error> for CoreError {
    fn from(err: wavectl_api::Error) -> Self {
        match err {
            wavectl_api::Error::Transport(ref e) if e.is_connect() => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| "<unknown>".into()),
                reason: e.to_string(),
            },
            other => CoreError::Api(other),
        }
    }
}
