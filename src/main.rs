use anyhow::Context;
use clap::Parser;
use tracing::info;

use feed_watch::cli::{Cli, Commands};
use feed_watch::config::Config;
use feed_watch::logging;
use feed_watch::scheduler::{signals, Scheduler, Shutdown};
use feed_watch::services::{
    DeliveryMode, DisabledNotifier, NotificationService, Notifier, PollService,
};
use feed_watch::sources::RssAtomSource;
use feed_watch::storage::{SeenStore, SqliteSeenRepository, SqliteStorage};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    logging::init(&config.log_level);
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Run {
            once,
            dry_run,
            skip_notify,
        } => cmd_run(&config, once, delivery_mode(dry_run, skip_notify)),
        Commands::Seen { id } => cmd_seen(&config, &id),
        Commands::Status => cmd_status(&config),
    }
}

fn delivery_mode(dry_run: bool, skip_notify: bool) -> DeliveryMode {
    if skip_notify {
        DeliveryMode::SkipNotify
    } else if dry_run {
        DeliveryMode::DryRun
    } else {
        DeliveryMode::Notify
    }
}

fn open_store(config: &Config) -> anyhow::Result<SqliteSeenRepository> {
    let storage = SqliteStorage::new(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path))?;
    Ok(SqliteSeenRepository::new(storage))
}

fn cmd_run(config: &Config, once: bool, mode: DeliveryMode) -> anyhow::Result<()> {
    let notifier: Box<dyn Notifier> = match mode {
        DeliveryMode::Notify => Box::new(
            NotificationService::from_config(config).context("Failed to set up notifier")?,
        ),
        DeliveryMode::SkipNotify | DeliveryMode::DryRun => Box::new(DisabledNotifier),
    };

    let source = RssAtomSource::from_config(config).context("Failed to set up feed client")?;
    let store = open_store(config)?;

    match mode {
        DeliveryMode::SkipNotify => {
            println!("Running in skip-notify mode: new entries are marked seen, nothing is sent.")
        }
        DeliveryMode::DryRun => println!("Dry run: nothing will be marked or sent."),
        DeliveryMode::Notify => {}
    }

    let service = PollService::new(store, source, notifier).with_mode(mode);

    if once {
        let result = service.run_cycle();
        service.into_store().close().context("Failed to close database")?;

        let report = result?;
        println!(
            "Fetched {} entries: {} new, {} notified, {} failed.",
            report.fetched, report.new_entries, report.notified, report.failed_notifications
        );
        return Ok(());
    }

    let shutdown = Shutdown::new();
    signals::listen(shutdown.clone()).context("Failed to install signal handlers")?;

    let summary = Scheduler::new(service, config.poll_interval(), shutdown)
        .run()
        .context("Failed to close database")?;

    info!(
        cycles = summary.cycles,
        notified = summary.notified,
        "Stopped"
    );
    Ok(())
}

fn cmd_seen(config: &Config, id: &str) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let seen = store.has_seen(id)?;
    store.close()?;

    if seen {
        println!("{}: seen", id);
    } else {
        println!("{}: not seen", id);
    }

    Ok(())
}

fn cmd_status(config: &Config) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let count = store.count()?;
    store.close()?;

    println!("Database: {}", config.db_path);
    println!("Seen entries: {}", count);
    println!("Feed: {}", config.feed_url);
    println!("Poll interval: {}s", config.poll_interval_secs);

    Ok(())
}
