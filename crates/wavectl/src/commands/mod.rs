//! Command dispatch: resolve the target device once, then route to the
//! per-command handlers.

pub mod config_cmd;
pub mod discover;
pub mod interactions;
pub mod shutter;
pub mod status;
pub mod wavelength;

use wavectl_core::{Laser, resolve_endpoint};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Route a parsed command. Commands that talk to a device share the
/// resolve → connect preamble here.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Config(args) => config_cmd::handle(&args, global),
        Command::Discover(args) => discover::handle(&args, global).await,

        cmd => {
            let laser = connect(global).await?;
            match cmd {
                Command::Status => status::handle(&laser, global).await,
                Command::Wavelength(args) => wavelength::handle(&args, &laser, global).await,
                Command::Shutter(args) => shutter::handle(&args, &laser, global).await,
                Command::Interactions => interactions::handle(&laser, global).await,
                // Handled above; unreachable by construction.
                Command::Config(_) | Command::Discover(_) => Ok(()),
            }
        }
    }
}

/// Resolve the configured endpoint (discovery for serials) and open
/// the facade.
async fn connect(global: &GlobalOpts) -> Result<Laser, CliError> {
    let resolved = config::resolve(global)?;
    let base_url = resolve_endpoint(&resolved.endpoint, resolved.laser.discovery_timeout).await?;
    tracing::debug!(%base_url, "endpoint resolved");
    Ok(Laser::connect(&base_url, resolved.laser).await?)
}
