//! `wavectl config init|show|path`.

use wavectl_config::{config_path, load_config_or_default, save_config, starter_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_path();
    if path.exists() {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let written = save_config(&starter_config()).map_err(CliError::Config)?;
    output::print_output(
        &format!("Wrote starter config to {}", written.display()),
        global.quiet,
    );
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = load_config_or_default();
    let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}
