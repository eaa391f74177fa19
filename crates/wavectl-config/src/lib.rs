//! Shared configuration for the wavectl CLI.
//!
//! TOML profiles (one per physical laser), figment-based loading
//! (file + `WAVECTL_` env), and translation to
//! `wavectl_core::LaserConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wavectl_core::{DeviceEndpoint, LaserConfig, monitor::PollPolicy};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' names neither a serial number nor a base URL")]
    NoEndpoint { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named laser profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_http_timeout() -> u64 {
    10
}

/// A named laser profile. Exactly one of `serial` / `base_url` is
/// required; `serial` costs one discovery scan at connect time.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Device serial number (e.g. "Orpheus-F-Demo-1023").
    pub serial: Option<String>,

    /// Already-resolved control base URL; skips discovery.
    pub base_url: Option<String>,

    /// Discovery window in milliseconds.
    pub discovery_timeout_ms: Option<u64>,

    /// Delay between status polls while tuning, in milliseconds.
    pub poll_interval_ms: Option<u64>,

    /// Overall bound on one tuning operation, in seconds.
    pub tune_timeout_secs: Option<u64>,

    /// Settle window before read-back verification, in milliseconds.
    pub settle_delay_ms: Option<u64>,

    /// Bound on one operator acknowledgment, in seconds.
    pub user_action_timeout_secs: Option<u64>,

    /// Verify state-changing writes by reading the value back.
    pub verify_writes: Option<bool>,

    /// HTTP per-request timeout override, in seconds.
    pub http_timeout_secs: Option<u64>,
}

impl Profile {
    /// The configured endpoint, serial taking precedence when both are
    /// (redundantly) present.
    pub fn endpoint(&self, profile_name: &str) -> Result<DeviceEndpoint, ConfigError> {
        if let Some(ref serial) = self.serial {
            return Ok(DeviceEndpoint::Serial(serial.clone()));
        }
        if let Some(ref url) = self.base_url {
            return Ok(DeviceEndpoint::BaseUrl(url.clone()));
        }
        Err(ConfigError::NoEndpoint {
            profile: profile_name.into(),
        })
    }

    /// Translate this profile (plus global defaults) into the facade
    /// configuration.
    pub fn laser_config(&self, defaults: &Defaults) -> LaserConfig {
        let base = LaserConfig::default();
        let poll_defaults = PollPolicy::default();

        LaserConfig {
            http_timeout: Duration::from_secs(
                self.http_timeout_secs.unwrap_or(defaults.http_timeout_secs),
            ),
            discovery_timeout: self
                .discovery_timeout_ms
                .map_or(base.discovery_timeout, Duration::from_millis),
            poll: PollPolicy {
                poll_interval: self
                    .poll_interval_ms
                    .map_or(poll_defaults.poll_interval, Duration::from_millis),
                max_duration: self
                    .tune_timeout_secs
                    .map_or(poll_defaults.max_duration, Duration::from_secs),
                settle_delay: self
                    .settle_delay_ms
                    .map_or(poll_defaults.settle_delay, Duration::from_millis),
                user_action_timeout: self.user_action_timeout_secs.map(Duration::from_secs),
                ..poll_defaults
            },
            verify_writes: self.verify_writes.unwrap_or(base.verify_writes),
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "hyperbliss", "wavectl").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wavectl");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit path (test seam).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WAVECTL_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(path)
}

/// Starter config written by `wavectl config init`.
pub fn starter_config() -> Config {
    let mut profiles = HashMap::new();
    profiles.insert(
        "lab".to_owned(),
        Profile {
            serial: Some("Orpheus-F-Demo-1023".into()),
            ..Profile::default()
        },
    );
    Config {
        default_profile: Some("lab".into()),
        defaults: Defaults::default(),
        profiles,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn profile_requires_an_endpoint() {
        let profile = Profile::default();
        assert!(matches!(
            profile.endpoint("lab"),
            Err(ConfigError::NoEndpoint { .. })
        ));
    }

    #[test]
    fn serial_takes_precedence_over_base_url() {
        let profile = Profile {
            serial: Some("Orpheus-F-Demo-1023".into()),
            base_url: Some("http://192.0.2.10:8004/P23894/v0/PublicAPI".into()),
            ..Profile::default()
        };
        assert_eq!(
            profile.endpoint("lab").unwrap(),
            DeviceEndpoint::Serial("Orpheus-F-Demo-1023".into())
        );
    }

    #[test]
    fn profile_overrides_flow_into_laser_config() {
        let profile = Profile {
            base_url: Some("http://192.0.2.10/api".into()),
            poll_interval_ms: Some(500),
            tune_timeout_secs: Some(120),
            settle_delay_ms: Some(250),
            verify_writes: Some(false),
            http_timeout_secs: Some(3),
            ..Profile::default()
        };
        let cfg = profile.laser_config(&Defaults::default());

        assert_eq!(cfg.http_timeout, Duration::from_secs(3));
        assert_eq!(cfg.poll.poll_interval, Duration::from_millis(500));
        assert_eq!(cfg.poll.max_duration, Duration::from_secs(120));
        assert_eq!(cfg.poll.settle_delay, Duration::from_millis(250));
        assert_eq!(cfg.poll.user_action_timeout, None);
        assert!(!cfg.verify_writes);
    }

    #[test]
    fn toml_round_trip_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
default_profile = "lab"

[defaults]
output = "json"

[profiles.lab]
serial = "Orpheus-F-Demo-1023"
tune_timeout_secs = 300

[profiles.bench]
base_url = "http://192.0.2.10:8004/P23894/v0/PublicAPI"
"#
        )
        .unwrap();

        let cfg = load_config_from(file.path()).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("lab"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.profiles.len(), 2);
        assert_eq!(
            cfg.profiles["lab"].serial.as_deref(),
            Some("Orpheus-F-Demo-1023")
        );
        assert_eq!(cfg.profiles["lab"].tune_timeout_secs, Some(300));
        assert!(cfg.profiles["bench"].base_url.is_some());
    }
}
