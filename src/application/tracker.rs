use crate::domain::action::{Action, LineState, classify};
use crate::domain::ports::{ActuatorBox, ReporterBox, TransactionSourceBox};
use crate::domain::report::{PaymentReport, shortened_id};
use crate::domain::tracker::{TrackerState, Transition};
use crate::domain::transaction::select_latest;
use crate::error::TrackerError;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// What a single tick did.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TickOutcome {
    /// The source could not be reached; state is untouched.
    FetchFailed,
    /// The source returned no usable payments.
    NoTransaction,
    /// The most recent payment is the one already on record.
    Unchanged,
    /// First payment ever seen. Reported, never actuated.
    Observed(Transition),
    Transitioned {
        transition: Transition,
        action: Action,
        actuated: bool,
    },
}

/// The polling driver.
///
/// `PaymentTracker` owns the only copy of the tracker state. `tick` takes
/// `&mut self`, and `run` awaits each tick before waiting for the next one, so
/// detection and actuation never run concurrently.
pub struct PaymentTracker {
    source: TransactionSourceBox,
    actuator: ActuatorBox,
    reporter: ReporterBox,
    state: TrackerState,
    interval: Duration,
}

impl PaymentTracker {
    /// Creates a new `PaymentTracker` instance.
    ///
    /// # Arguments
    ///
    /// * `source` - Where payments are polled from.
    /// * `actuator` - The output lines.
    /// * `reporter` - Receives one report per transition.
    /// * `interval` - Fixed delay between ticks.
    pub fn new(
        source: TransactionSourceBox,
        actuator: ActuatorBox,
        reporter: ReporterBox,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            actuator,
            reporter,
            state: TrackerState::new(),
            interval,
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Runs one fetch, select, detect, classify, actuate, report cycle.
    ///
    /// Fetch, hardware and report failures are logged and absorbed; the next
    /// tick starts from the state this one left behind.
    pub async fn tick(&mut self) -> TickOutcome {
        let previous_id = self.state.previous().map(|tx| tx.id.clone());

        let transactions = match self.source.fetch().await {
            Ok(transactions) => transactions,
            Err(TrackerError::MalformedResponse(reason)) => {
                warn!(
                    previous = ?previous_id,
                    %reason,
                    "Malformed payments response, treating as empty"
                );
                Vec::new()
            }
            Err(e) => {
                error!(previous = ?previous_id, error = %e, "Failed to fetch payments");
                return TickOutcome::FetchFailed;
            }
        };

        let Some(latest) = select_latest(transactions) else {
            info!("No payments found");
            return TickOutcome::NoTransaction;
        };

        let Some(transition) = self.state.advance(Some(latest)) else {
            return TickOutcome::Unchanged;
        };

        let old_id = transition.old.as_ref().map(|tx| tx.id.as_str());
        info!(
            "Payment ID changed from {} to {}",
            shortened_id(old_id),
            shortened_id(Some(&transition.new.id))
        );

        let action = classify(transition.new.status, !transition.is_initial());
        let actuated = self.actuate(action, &transition).await;

        let report = PaymentReport::new(&transition, actuated, action.is_alarm());
        if report.new_payment_last4 == report.old_payment_last4 {
            info!("Last 4 digits of payment ID are the same");
        }
        if action.is_alarm() {
            warn!(
                payment = %transition.new.id,
                status = %transition.new.raw_status,
                "Payment failed or was canceled"
            );
        }
        if let Err(e) = self.reporter.report(&report).await {
            error!(
                previous = ?old_id,
                current = %transition.new.id,
                error = %e,
                "Failed to write payment report"
            );
        }

        if transition.is_initial() {
            TickOutcome::Observed(transition)
        } else {
            TickOutcome::Transitioned {
                transition,
                action,
                actuated,
            }
        }
    }

    /// Performs the line write for `action`, returning whether it took effect.
    ///
    /// If the other line is still held from an earlier transition it is driven
    /// low first. When that release fails the new line is left alone, so the
    /// two lines are never high together.
    async fn actuate(&mut self, action: Action, transition: &Transition) -> bool {
        let Some((line, level)) = action.line_write() else {
            return false;
        };
        let old_id = transition.old.as_ref().map(|tx| tx.id.as_str());

        if let Some(held) = self.state.line_to_release(line) {
            match self.actuator.set_line(held, LineState::Low).await {
                Ok(()) => {
                    info!(line = %held, payment = %transition.new.id, "Line released");
                    self.state.clear_trigger();
                }
                Err(e) => {
                    error!(
                        line = %held,
                        blocked = %line,
                        previous = ?old_id,
                        current = %transition.new.id,
                        error = %e,
                        "Failed to release output line"
                    );
                    return false;
                }
            }
        }

        match self.actuator.set_line(line, level).await {
            Ok(()) => {
                info!(%line, ?level, payment = %transition.new.id, "Line triggered");
                self.state.record_trigger(line);
                true
            }
            Err(e) => {
                error!(
                    %line,
                    previous = ?old_id,
                    current = %transition.new.id,
                    error = %e,
                    "Failed to drive output line"
                );
                false
            }
        }
    }

    /// Ticks at the fixed interval until `shutdown` resolves.
    ///
    /// A tick that overruns the interval causes the missed ticks to be
    /// skipped, never queued or overlapped. `shutdown` is only observed
    /// between ticks.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        info!(interval_ms = self.interval.as_millis() as u64, "Tracking payments");
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping tracker");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}
