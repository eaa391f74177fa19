//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wavectl_core::CoreError;

/// Exit codes per the CLI contract.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const OPERATION: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(wavectl::connection_failed),
        help(
            "Check that the device is powered on and its server application is running.\n\
             URL: {url}\n\
             Try: wavectl discover"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No device with serial number '{serial}' answered discovery")]
    #[diagnostic(
        code(wavectl::device_not_found),
        help(
            "Run: wavectl discover to list devices on this subnet.\n\
             Discovery uses UDP multicast/broadcast -- check that the device is on\n\
             the same L2 segment and no firewall drops port 7415."
        )
    )]
    DeviceNotFound { serial: String },

    // ── Operations ───────────────────────────────────────────────────

    #[error("Operation did not converge in time")]
    #[diagnostic(
        code(wavectl::operation_timeout),
        help(
            "The device never reported completion. Increase tune_timeout_secs in\n\
             the profile, or check the device's own UI for a stuck operation."
        )
    )]
    OperationTimeout { detail: String },

    #[error("Device accepted the request but the value did not take effect: {detail}")]
    #[diagnostic(
        code(wavectl::value_mismatch),
        help(
            "The device acknowledged the command and reported completion, yet the\n\
             read-back differs. This usually means hardware needs attention --\n\
             retrying is unlikely to help."
        )
    )]
    ValueMismatch { detail: String },

    #[error("Operation aborted: {reason}")]
    #[diagnostic(code(wavectl::operation_aborted))]
    OperationAborted { reason: String },

    #[error("{message}")]
    #[diagnostic(code(wavectl::operation_failed))]
    OperationFailed { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wavectl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No device endpoint configured")]
    #[diagnostic(
        code(wavectl::no_endpoint),
        help(
            "Pass --serial or --base-url, or create a profile:\n\
             wavectl config init\n\
             Expected config at: {path}"
        )
    )]
    NoEndpoint { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wavectl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wavectl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(wavectl::config_exists),
        help("Edit it directly, or delete it first to re-run init.")
    )]
    ConfigExists { path: String },

    #[error(transparent)]
    #[diagnostic(code(wavectl::config))]
    Config(#[from] wavectl_config::ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(wavectl::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::DeviceNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::OperationTimeout { .. } => exit_code::TIMEOUT,
            Self::ValueMismatch { .. }
            | Self::OperationAborted { .. }
            | Self::OperationFailed { .. } => exit_code::OPERATION,
            Self::Validation { .. } | Self::NoEndpoint { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::DeviceNotFound { serial } => CliError::DeviceNotFound { serial },

            CoreError::Timeout { .. } => CliError::OperationTimeout {
                detail: err.to_string(),
            },

            CoreError::ValueMismatch { .. } | CoreError::ShutterMismatch { .. } => {
                CliError::ValueMismatch {
                    detail: err.to_string(),
                }
            }

            CoreError::UserActionTimeout { .. }
            | CoreError::UserActionAbandoned
            | CoreError::Cancelled => CliError::OperationAborted {
                reason: err.to_string(),
            },

            CoreError::NoInteractionForWavelength { .. }
            | CoreError::WavelengthOutOfRange { .. } => CliError::Validation {
                field: "wavelength".into(),
                reason: err.to_string(),
            },

            CoreError::UnknownInteraction { .. } => CliError::Validation {
                field: "interaction".into(),
                reason: err.to_string(),
            },

            CoreError::Api(e) => CliError::OperationFailed {
                message: e.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
