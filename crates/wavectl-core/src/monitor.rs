// ── Operation monitor ──
//
// The device's control surface is fire-and-forget at the HTTP layer: a
// PUT only acknowledges receipt of a command. Whether the operation
// actually happened is observed here, by polling status until the
// device settles, pausing around physical interlock confirmations, and
// verifying the read-back value against what was requested.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{TuneStatus, UserPrompt};

// ── Seams ────────────────────────────────────────────────────────────

/// The device operations the monitor drives.
///
/// Implemented over the REST client by [`Laser`](crate::Laser), and by
/// scripted fakes in tests.
#[allow(async_fn_in_trait)]
pub trait TuneOperation {
    /// Fetch a fresh status snapshot. Never cached between ticks.
    async fn status(&self) -> Result<TuneStatus, CoreError>;

    /// Tell the device the operator completed the required actions,
    /// optionally restoring the shutter to its prior state.
    async fn resume_after_user_action(&self, restore_shutter: bool) -> Result<(), CoreError>;

    /// Read back the value the operation was supposed to change.
    async fn read_back(&self) -> Result<f64, CoreError>;
}

/// How the embedding application delivers the human interlock signal.
///
/// The reference hardware blocks on a physical acknowledgment for some
/// operations; this trait makes that an explicit suspension point the
/// caller owns: a CLI prompts on the terminal, a service exposes an
/// acknowledgment endpoint, a test acknowledges immediately.
#[allow(async_fn_in_trait)]
pub trait UserActionHandler {
    /// Present the prompts and wait for the operator's acknowledgment.
    /// Return an error to abandon the operation.
    async fn acknowledge(&self, prompts: &[UserPrompt]) -> Result<(), CoreError>;

    /// Progress callback, called once per poll tick with the current
    /// completion fraction.
    fn progress(&self, _fraction: f64) {}
}

/// Acknowledges every prompt without operator involvement.
///
/// For scripted use (`--yes`) and for operations that are not expected
/// to hit an interlock.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoAcknowledge;

impl UserActionHandler for AutoAcknowledge {
    async fn acknowledge(&self, prompts: &[UserPrompt]) -> Result<(), CoreError> {
        for prompt in prompts {
            debug!(text = %prompt.text, "auto-acknowledging user action prompt");
        }
        Ok(())
    }
}

// ── Policy ───────────────────────────────────────────────────────────

/// Poll/convergence policy for one apply-and-confirm call.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Delay between status fetches.
    pub poll_interval: Duration,
    /// Overall wall-clock bound for the whole operation, including any
    /// time spent waiting on the operator.
    pub max_duration: Duration,
    /// Wait after the device reports completion before the read-back
    /// verification; the hardware needs a moment to settle.
    pub settle_delay: Duration,
    /// Consecutive status-poll failures tolerated before aborting.
    pub max_transport_failures: u32,
    /// Separate bound on one operator acknowledgment, if any.
    pub user_action_timeout: Option<Duration>,
    /// Read-back comparison tolerance in nanometers.
    pub value_tolerance: f64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(250),
            max_duration: Duration::from_secs(600),
            settle_delay: Duration::from_secs(1),
            max_transport_failures: 3,
            user_action_timeout: None,
            value_tolerance: 0.01,
        }
    }
}

// ── Monitor ──────────────────────────────────────────────────────────

/// Drives one already-issued device operation to convergence.
///
/// The set command must have been sent before calling
/// [`apply_and_confirm`](Self::apply_and_confirm); the monitor's job
/// starts after the device acknowledged receipt.
#[derive(Debug, Clone)]
pub struct Monitor {
    policy: PollPolicy,
    cancel: CancellationToken,
}

impl Monitor {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach a cancellation token so a caller can abort a stuck
    /// operation instead of waiting out the monitor's own bounds.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Poll until the operation settles, pausing around user actions,
    /// then verify the read-back against `verify` (skipped when
    /// `None`). `restore_shutter` is forwarded with the resume
    /// directive after each acknowledged user action.
    pub async fn apply_and_confirm<O, H>(
        &self,
        op: &O,
        verify: Option<f64>,
        restore_shutter: bool,
        handler: &H,
    ) -> Result<(), CoreError>
    where
        O: TuneOperation,
        H: UserActionHandler,
    {
        let deadline = Instant::now() + self.policy.max_duration;
        let mut consecutive_failures = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(CoreError::Cancelled);
            }
            if Instant::now() >= deadline {
                return Err(CoreError::Timeout {
                    limit: self.policy.max_duration,
                });
            }

            let status = match op.status().await {
                Ok(status) => {
                    consecutive_failures = 0;
                    status
                }
                Err(e) => {
                    consecutive_failures += 1;
                    if consecutive_failures >= self.policy.max_transport_failures {
                        warn!(error = %e, failures = consecutive_failures, "aborting after repeated status failures");
                        return Err(e);
                    }
                    warn!(error = %e, failures = consecutive_failures, "status poll failed");
                    self.sleep_tick(deadline).await?;
                    continue;
                }
            };

            handler.progress(status.fraction_complete);

            if status.awaiting_user_action {
                debug!(prompts = status.prompts.len(), "device is waiting for operator action");
                self.await_acknowledgment(handler, &status.prompts, deadline)
                    .await?;
                op.resume_after_user_action(restore_shutter).await?;
                continue;
            }

            if !status.in_progress {
                break;
            }

            self.sleep_tick(deadline).await?;
        }

        // Converged. Give the hardware a settle window, then confirm
        // the change actually stuck.
        let Some(target) = verify else {
            debug!("operation settled (verification disabled)");
            return Ok(());
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(CoreError::Cancelled),
            () = tokio::time::sleep(self.policy.settle_delay) => {}
        }

        let actual = op.read_back().await?;
        if (actual - target).abs() > self.policy.value_tolerance {
            return Err(CoreError::ValueMismatch {
                requested: target,
                actual,
            });
        }
        debug!(target, actual, "operation converged and verified");
        Ok(())
    }

    /// Sleep one poll interval, clipped to the overall deadline,
    /// honoring cancellation.
    async fn sleep_tick(&self, deadline: Instant) -> Result<(), CoreError> {
        let wake = (Instant::now() + self.policy.poll_interval).min(deadline);
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            () = tokio::time::sleep_until(wake) => Ok(()),
        }
    }

    /// Wait for the operator, bounded by the user-action timeout (if
    /// configured) and the overall deadline, honoring cancellation.
    async fn await_acknowledgment<H: UserActionHandler>(
        &self,
        handler: &H,
        prompts: &[UserPrompt],
        deadline: Instant,
    ) -> Result<(), CoreError> {
        let (limit, user_bound) = match self.policy.user_action_timeout {
            Some(bound) => {
                let user_deadline = Instant::now() + bound;
                if user_deadline < deadline {
                    (user_deadline, Some(bound))
                } else {
                    (deadline, None)
                }
            }
            None => (deadline, None),
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            outcome = tokio::time::timeout_at(limit, handler.acknowledge(prompts)) => match outcome {
                Ok(acknowledged) => acknowledged,
                Err(_) => Err(match user_bound {
                    Some(bound) => CoreError::UserActionTimeout { limit: bound },
                    None => CoreError::Timeout { limit: self.policy.max_duration },
                }),
            },
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
