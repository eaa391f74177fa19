//! Terminal implementation of the interlock acknowledgment seam.
//!
//! Tuning progress renders as an indicatif bar; when the device blocks
//! on a physical interlock the prompts are printed above the bar and a
//! dialoguer confirmation suspends the operation until the operator
//! answers (or `--yes` answers for them).

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use wavectl_core::{CoreError, UserActionHandler, UserPrompt};

pub struct TerminalHandler {
    bar: ProgressBar,
    yes: bool,
}

impl TerminalHandler {
    pub fn new(yes: bool, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar.set_message("tuning");
            bar
        };
        Self { bar, yes }
    }

    /// Finish the progress bar with a closing message.
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_owned());
    }

    /// Drop the bar without a completion message (failure paths).
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

impl UserActionHandler for TerminalHandler {
    async fn acknowledge(&self, prompts: &[UserPrompt]) -> Result<(), CoreError> {
        self.bar
            .println(format!("{}", "Operator action required:".yellow().bold()));
        for prompt in prompts {
            match &prompt.image {
                Some(image) => self
                    .bar
                    .println(format!("  • {} (see {image})", prompt.text)),
                None => self.bar.println(format!("  • {}", prompt.text)),
            }
        }

        if self.yes {
            self.bar.println("auto-confirming (--yes)");
            return Ok(());
        }

        // dialoguer is blocking; keep the runtime responsive.
        let confirmed = tokio::task::spawn_blocking(|| {
            dialoguer::Confirm::new()
                .with_prompt("Confirm once the actions above are complete")
                .default(true)
                .interact()
        })
        .await
        .map_err(|_| CoreError::UserActionAbandoned)?
        .map_err(|_| CoreError::UserActionAbandoned)?;

        if confirmed {
            Ok(())
        } else {
            Err(CoreError::UserActionAbandoned)
        }
    }

    fn progress(&self, fraction: f64) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        self.bar
            .set_position((fraction.clamp(0.0, 1.0) * 100.0).round() as u64);
    }
}
