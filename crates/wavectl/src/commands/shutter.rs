//! `wavectl shutter get|open|close`.

use wavectl_core::{Laser, ShutterState};

use crate::cli::{GlobalOpts, ShutterArgs, ShutterCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &ShutterArgs, laser: &Laser, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ShutterCommand::Get => {
            let state = laser.shutter().await?;
            let rendered = output::render_single(
                &global.output,
                &state,
                |s| format!("Shutter: {s}"),
                ShutterState::to_string,
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
        ShutterCommand::Open => set(laser, ShutterState::Open, global).await,
        ShutterCommand::Close => set(laser, ShutterState::Closed, global).await,
    }
}

async fn set(laser: &Laser, state: ShutterState, global: &GlobalOpts) -> Result<(), CliError> {
    laser.set_shutter(state).await?;
    output::print_output(&format!("Shutter {state}"), global.quiet);
    Ok(())
}
