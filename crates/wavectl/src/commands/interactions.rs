//! `wavectl interactions` -- list the device's tuning configurations.

use tabled::Tabled;

use wavectl_core::{Interaction, Laser};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct InteractionRow {
    #[tabled(rename = "Interaction")]
    name: String,
    #[tabled(rename = "From (nm)")]
    from: f64,
    #[tabled(rename = "To (nm)")]
    to: f64,
}

impl From<&Interaction> for InteractionRow {
    fn from(i: &Interaction) -> Self {
        Self {
            name: i.name.clone(),
            from: i.from_nm,
            to: i.to_nm,
        }
    }
}

pub async fn handle(laser: &Laser, global: &GlobalOpts) -> Result<(), CliError> {
    let interactions = laser.interactions().await?;

    let rendered = output::render_list(&global.output, &interactions, |i| InteractionRow::from(i), |i| {
        i.name.clone()
    });
    output::print_output(&rendered, global.quiet);
    Ok(())
}
