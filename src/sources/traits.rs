use crate::domain::Entry;
use crate::errors::WatchResult;

#[cfg_attr(test, mockall::automock)]
pub trait FeedSource: Send + Sync {
    /// Fetch the full current snapshot of entries, in feed order
    fn fetch(&self) -> WatchResult<Vec<Entry>>;
}
