//! `wavectl discover` -- scan the subnet for Topas4 devices.

use std::time::Duration;

use tabled::Tabled;

use wavectl_core::{DiscoveredDevice, laser};

use crate::cli::{DiscoverArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "GUID")]
    guid: String,
    #[tabled(rename = "Control URL")]
    url: String,
}

impl From<&DiscoveredDevice> for DeviceRow {
    fn from(d: &DiscoveredDevice) -> Self {
        Self {
            serial: d.serial_number.clone(),
            guid: d.sender_guid.to_string(),
            url: d.base_url.clone(),
        }
    }
}

pub async fn handle(args: &DiscoverArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let devices = laser::discover(Duration::from_millis(args.window_ms)).await?;

    if devices.is_empty() && matches!(global.output, crate::cli::OutputFormat::Table) {
        output::print_output("No Topas4 devices answered.", global.quiet);
        return Ok(());
    }

    let rendered = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| {
        d.serial_number.clone()
    });
    output::print_output(&rendered, global.quiet);
    Ok(())
}
