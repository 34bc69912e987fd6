use std::thread;

use tokio::runtime::{Builder, Runtime};
use tracing::info;

use crate::errors::WatchResult;
use crate::scheduler::Shutdown;

/// Trip `shutdown` on SIGINT or SIGTERM (Ctrl-C on non-Unix targets).
///
/// Handlers are registered before this returns; the wait itself happens on a
/// background thread so the scheduler loop stays synchronous.
pub fn listen(shutdown: Shutdown) -> WatchResult<()> {
    let runtime = Builder::new_current_thread().enable_all().build()?;
    let waiter = register(&runtime)?;

    thread::Builder::new()
        .name("signal-listener".to_string())
        .spawn(move || {
            let name = runtime.block_on(waiter);
            info!(signal = name, "Shutdown requested");
            shutdown.trigger();
        })?;

    Ok(())
}

#[cfg(unix)]
fn register(
    runtime: &Runtime,
) -> WatchResult<impl std::future::Future<Output = &'static str> + Send + 'static> {
    use tokio::signal::unix::{signal, SignalKind};

    let _guard = runtime.enter();
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
        }
    })
}

#[cfg(not(unix))]
fn register(
    runtime: &Runtime,
) -> WatchResult<impl std::future::Future<Output = &'static str> + Send + 'static> {
    let _guard = runtime.enter();

    Ok(async move {
        let _ = tokio::signal::ctrl_c().await;
        "ctrl-c"
    })
}
