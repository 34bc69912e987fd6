use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feed-watch")]
#[command(about = "Polls a feed and sends an ntfy notification for every new entry")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "FEED_WATCH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the feed and notify new entries until interrupted
    Run {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,

        /// Dry run - don't send notifications or mark entries, just show what would be sent
        #[arg(long)]
        dry_run: bool,

        /// Skip notifications but still mark entries as seen in the database
        #[arg(long)]
        skip_notify: bool,
    },

    /// Check whether an entry identifier has been seen
    Seen {
        /// Entry identifier (the feed item's guid)
        id: String,
    },

    /// Show the seen ledger location and size
    Status,
}
