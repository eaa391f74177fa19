use std::net::SocketAddr;

use thiserror::Error;

/// Top-level error type for the `wavectl-api` crate.
///
/// Covers every failure mode across both wire surfaces: UDP discovery
/// and the HTTP control API. `wavectl-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Discovery ───────────────────────────────────────────────────
    /// Could not create or bind the discovery socket. Fatal for the
    /// discovery call, not for the process.
    #[error("Failed to open discovery socket: {0}")]
    Bind(#[source] std::io::Error),

    /// No probe reached any destination. A single destination failing
    /// is logged and tolerated; this is only raised when every send
    /// failed and no reply can possibly arrive.
    #[error("Discovery probe to {target} failed: {source}")]
    ProbeSend {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The device answered with a non-success HTTP status.
    #[error("Device returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status, .. } => *status == 503,
            _ => false,
        }
    }

    /// Extract the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
