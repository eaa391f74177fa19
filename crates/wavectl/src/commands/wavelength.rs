//! `wavectl wavelength get|set` -- read and tune the output wavelength.

use wavectl_core::Laser;

use crate::cli::{GlobalOpts, WavelengthArgs, WavelengthCommand, WavelengthSetArgs};
use crate::error::CliError;
use crate::output;
use crate::prompt::TerminalHandler;

pub async fn handle(
    args: &WavelengthArgs,
    laser: &Laser,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match &args.command {
        WavelengthCommand::Get => get(laser, global).await,
        WavelengthCommand::Set(set_args) => set(set_args, laser, global).await,
    }
}

async fn get(laser: &Laser, global: &GlobalOpts) -> Result<(), CliError> {
    let nm = laser.wavelength().await?;
    let rendered = output::render_single(
        &global.output,
        &nm,
        |nm| format!("Wavelength: {nm} nm"),
        f64::to_string,
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}

async fn set(args: &WavelengthSetArgs, laser: &Laser, global: &GlobalOpts) -> Result<(), CliError> {
    let handler = TerminalHandler::new(global.yes, global.quiet);

    // Ctrl-C aborts the monitor instead of killing the process with a
    // half-tracked operation.
    let cancel = laser.cancellation_token();
    let ctrlc = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = laser
        .set_wavelength(
            args.nm,
            args.interaction.as_deref(),
            !args.no_restore_shutter,
            &handler,
        )
        .await;
    ctrlc.abort();

    match outcome {
        Ok(()) => {
            handler.finish("tuned");
            output::print_output(&format!("Wavelength set to {} nm", args.nm), global.quiet);
            Ok(())
        }
        Err(e) => {
            handler.abandon();
            Err(e.into())
        }
    }
}
