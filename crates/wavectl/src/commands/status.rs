//! `wavectl status` -- one-shot snapshot of the device.

use serde::Serialize;

use wavectl_core::{Laser, ShutterState};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct StatusView {
    base_url: String,
    wavelength_nm: f64,
    shutter: ShutterState,
    tuning_in_progress: bool,
    awaiting_user_action: bool,
    fraction_complete: f64,
}

fn detail(s: &StatusView) -> String {
    let mut lines = vec![
        format!("Device:     {}", s.base_url),
        format!("Wavelength: {} nm", s.wavelength_nm),
        format!("Shutter:    {}", s.shutter),
    ];
    if s.tuning_in_progress {
        lines.push(format!(
            "Tuning:     in progress ({:.0}%)",
            s.fraction_complete * 100.0
        ));
    }
    if s.awaiting_user_action {
        lines.push("Tuning:     waiting for operator action".into());
    }
    lines.join("\n")
}

pub async fn handle(laser: &Laser, global: &GlobalOpts) -> Result<(), CliError> {
    let tune = laser.tune_status().await?;
    let view = StatusView {
        base_url: laser.base_url().to_string(),
        wavelength_nm: laser.wavelength().await?,
        shutter: laser.shutter().await?,
        tuning_in_progress: tune.in_progress,
        awaiting_user_action: tune.awaiting_user_action,
        fraction_complete: tune.fraction_complete,
    };

    let rendered = output::render_single(&global.output, &view, detail, |s| {
        format!("{} {}", s.wavelength_nm, s.shutter)
    });
    output::print_output(&rendered, global.quiet);
    Ok(())
}
