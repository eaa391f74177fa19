//! Resolution of CLI flags + config file into a device endpoint and
//! facade configuration.

use std::time::Duration;

use wavectl_config::{Config, load_config_or_default};
use wavectl_core::{DeviceEndpoint, LaserConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything needed to connect to one laser.
pub struct Resolved {
    pub endpoint: DeviceEndpoint,
    pub laser: LaserConfig,
}

/// Resolve the target device and its configuration.
///
/// Precedence: explicit flags (`--base-url`, `--serial`) beat the
/// selected profile; the profile beats built-in defaults. `--timeout`
/// overrides the HTTP timeout from any source.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = load_config_or_default();

    // Flags alone are enough -- no profile required.
    if let Some(ref url) = global.base_url {
        return Ok(Resolved {
            endpoint: DeviceEndpoint::BaseUrl(url.clone()),
            laser: apply_overrides(LaserConfig::default(), global),
        });
    }
    if let Some(ref serial) = global.serial {
        return Ok(Resolved {
            endpoint: DeviceEndpoint::Serial(serial.clone()),
            laser: apply_overrides(LaserConfig::default(), global),
        });
    }

    let profile_name = active_profile_name(global, &cfg);
    let Some(profile) = cfg.profiles.get(&profile_name) else {
        // An explicitly requested profile that doesn't exist is its
        // own error; an absent default means nothing is configured.
        if global.profile.is_some() {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        return Err(CliError::NoEndpoint {
            path: wavectl_config::config_path().display().to_string(),
        });
    };

    let endpoint = profile.endpoint(&profile_name)?;
    let laser = apply_overrides(profile.laser_config(&cfg.defaults), global);
    Ok(Resolved { endpoint, laser })
}

/// The profile named on the command line, or the config default.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn apply_overrides(mut laser: LaserConfig, global: &GlobalOpts) -> LaserConfig {
    if let Some(secs) = global.timeout {
        laser.http_timeout = Duration::from_secs(secs);
    }
    laser
}

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
