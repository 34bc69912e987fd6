use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::{Entry, Notification};
use crate::errors::WatchError;
use crate::services::notification_service::Notifier;
use crate::sources::FeedSource;
use crate::storage::SeenStore;

/// What a cycle does with entries it has not seen before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Mark as seen, then notify.
    #[default]
    Notify,
    /// Mark as seen without notifying.
    SkipNotify,
    /// Only report; nothing is marked or sent.
    DryRun,
}

/// Failures that end a cycle early.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error("failed to fetch feed: {0}")]
    Fetch(#[source] WatchError),

    #[error("seen ledger failed on entry {entry_id}: {source}")]
    Store {
        entry_id: String,
        #[source]
        source: WatchError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Entries in the fetched snapshot
    pub fetched: usize,
    /// Entries not seen before this cycle
    pub new_entries: usize,
    pub notified: usize,
    pub failed_notifications: usize,
}

/// Runs one fetch → dedup → notify pass over injected collaborators.
pub struct PollService<S: SeenStore, F: FeedSource, N: Notifier> {
    store: S,
    source: F,
    notifier: N,
    mode: DeliveryMode,
}

impl<S: SeenStore, F: FeedSource, N: Notifier> PollService<S, F, N> {
    pub fn new(store: S, source: F, notifier: N) -> Self {
        Self {
            store,
            source,
            notifier,
            mode: DeliveryMode::Notify,
        }
    }

    pub fn with_mode(mut self, mode: DeliveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the ledger back so it can be closed.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Fetch the feed and handle every entry in feed order.
    ///
    /// A failed notification only affects its own entry, which stays marked.
    /// A ledger failure stops the cycle: carrying on could notify twice.
    pub fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let entries = self.source.fetch().map_err(CycleError::Fetch)?;

        let mut report = CycleReport {
            fetched: entries.len(),
            ..CycleReport::default()
        };

        for entry in &entries {
            self.process_entry(entry, &mut report)?;
        }

        Ok(report)
    }

    fn process_entry(&self, entry: &Entry, report: &mut CycleReport) -> Result<(), CycleError> {
        let store_error = |source: WatchError| CycleError::Store {
            entry_id: entry.id.clone(),
            source,
        };

        let is_new = match self.mode {
            DeliveryMode::DryRun => !self.store.has_seen(&entry.id).map_err(store_error)?,
            _ => self.store.check_and_mark(&entry.id).map_err(store_error)?,
        };

        if !is_new {
            debug!(id = %entry.id, "already seen");
            return Ok(());
        }

        report.new_entries += 1;
        info!(title = %entry.title, id = %entry.id, link = %entry.link, "New item");

        let notification = Notification::from_entry(entry);
        match self.mode {
            DeliveryMode::Notify => match self.notifier.send(&notification) {
                Ok(()) => report.notified += 1,
                Err(e) => {
                    // The mark stays: a flaky notifier must not cause repeat alerts.
                    report.failed_notifications += 1;
                    error!(id = %entry.id, error = %e, "Failed to send notification");
                }
            },
            DeliveryMode::SkipNotify => {
                debug!(id = %entry.id, "marked without notifying");
            }
            DeliveryMode::DryRun => {
                info!("[DRY RUN] would notify: {}", notification.format());
            }
        }

        Ok(())
    }
}
