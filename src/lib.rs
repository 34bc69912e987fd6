//! feed-watch: poll one feed, remember every entry it has shown, and send an
//! ntfy notification the first time an entry appears.
//!
//! * **`sources`** - the `FeedSource` trait and the HTTP RSS/Atom fetcher.
//! * **`storage`** - the `SeenStore` ledger, backed by SQLite.
//! * **`services`** - one poll cycle (`PollService`) and the ntfy `Notifier`.
//! * **`scheduler`** - the timer loop, shutdown token and signal listener.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod scheduler;
pub mod services;
pub mod sources;
pub mod storage;
