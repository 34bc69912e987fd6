use crate::errors::WatchResult;

/// Durable ledger of entry identifiers that have already been handled.
#[cfg_attr(test, mockall::automock)]
pub trait SeenStore: Send + Sync {
    /// Pure lookup, no side effect.
    fn has_seen(&self, entry_id: &str) -> WatchResult<bool>;

    /// Atomically test and insert `entry_id`. Returns `true` only for the call
    /// that created the record. On error nothing is written.
    fn check_and_mark(&self, entry_id: &str) -> WatchResult<bool>;

    /// Number of identifiers recorded so far.
    fn count(&self) -> WatchResult<u64>;

    /// Flush and release the ledger.
    fn close(self) -> WatchResult<()>;
}
