//! Poll loop.
//!
//! A single sequential loop services one event per iteration: the immediate
//! first run, the timer deadline, or the shutdown token. Cycles never
//! overlap and a running cycle is never interrupted; shutdown is observed
//! between cycles only.

pub mod shutdown;
pub mod signals;
pub mod ticker;

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::errors::WatchResult;
use crate::services::{CycleError, Notifier, PollService};
use crate::sources::FeedSource;
use crate::storage::SeenStore;

pub use shutdown::Shutdown;
pub use ticker::Ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Totals for one scheduler run, returned once it stops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: usize,
    pub failed_cycles: usize,
    pub notified: usize,
}

pub struct Scheduler<S: SeenStore, F: FeedSource, N: Notifier> {
    service: PollService<S, F, N>,
    interval: Duration,
    shutdown: Shutdown,
    state: SchedulerState,
}

impl<S: SeenStore, F: FeedSource, N: Notifier> Scheduler<S, F, N> {
    pub fn new(service: PollService<S, F, N>, interval: Duration, shutdown: Shutdown) -> Self {
        Self {
            service,
            interval,
            shutdown,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run until the shutdown token trips, then close the seen ledger.
    pub fn run(mut self) -> WatchResult<RunSummary> {
        let mut summary = RunSummary::default();
        let mut ticker = Ticker::new(self.interval, Instant::now());
        let mut immediate = true;

        info!(interval_secs = self.interval.as_secs(), "Scheduler started");

        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            if immediate {
                immediate = false;
            } else if self.shutdown.wait_timeout(ticker.remaining(Instant::now())) {
                break;
            }

            self.cycle(&mut summary);

            let skipped = ticker.rearm(Instant::now());
            if skipped > 0 {
                warn!(skipped, "Cycle overran the poll interval; dropped missed ticks");
            }
        }

        self.state = SchedulerState::Stopped;
        info!(
            cycles = summary.cycles,
            failed_cycles = summary.failed_cycles,
            "Exiting..."
        );

        self.service.into_store().close()?;
        Ok(summary)
    }

    fn cycle(&mut self, summary: &mut RunSummary) {
        self.state = SchedulerState::Running;
        summary.cycles += 1;

        info!("Fetching feed...");
        match self.service.run_cycle() {
            Ok(report) => {
                summary.notified += report.notified;
                info!(
                    fetched = report.fetched,
                    new = report.new_entries,
                    notified = report.notified,
                    failed = report.failed_notifications,
                    "Done!"
                );
            }
            Err(e @ CycleError::Fetch(_)) => {
                summary.failed_cycles += 1;
                error!(error = %e, "Failed to fetch feed");
            }
            Err(e @ CycleError::Store { .. }) => {
                summary.failed_cycles += 1;
                error!(error = %e, "Seen ledger failed; skipping rest of cycle");
            }
        }

        self.state = SchedulerState::Idle;
        debug!("Waiting for next tick");
    }
}
