// Domain model types, decoupled from the wire format.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Shutter ─────────────────────────────────────────────────────────

/// Shutter state of the laser output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutterState {
    Open,
    Closed,
}

impl ShutterState {
    /// Wire encoding: the device speaks bare booleans for the shutter.
    pub fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ShutterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ── Tuning status ───────────────────────────────────────────────────

/// Snapshot of an in-flight wavelength-setting operation.
///
/// Fetched fresh on every poll tick, never cached beyond one tick. An
/// operation counts as finished only when `in_progress` is false AND
/// `awaiting_user_action` is false.
#[derive(Debug, Clone, Serialize)]
pub struct TuneStatus {
    /// Progress in `[0, 1]`.
    pub fraction_complete: f64,
    /// The device is still working.
    pub in_progress: bool,
    /// The device is blocked on a physical/human confirmation.
    pub awaiting_user_action: bool,
    /// Ordered prompts to present while `awaiting_user_action`.
    pub prompts: Vec<UserPrompt>,
}

impl TuneStatus {
    /// True once the device has nothing left to do and nobody to wait for.
    pub fn is_settled(&self) -> bool {
        !self.in_progress && !self.awaiting_user_action
    }
}

/// One operator prompt with an optional illustration reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPrompt {
    pub text: String,
    pub image: Option<String>,
}

// ── Interactions ────────────────────────────────────────────────────

/// A named tuning configuration valid over a wavelength sub-range.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub name: String,
    pub from_nm: f64,
    pub to_nm: f64,
}

impl Interaction {
    /// Whether `nm` lies in this interaction's output range (inclusive).
    pub fn contains(&self, nm: f64) -> bool {
        nm >= self.from_nm && nm <= self.to_nm
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} - {} nm)", self.name, self.from_nm, self.to_nm)
    }
}
