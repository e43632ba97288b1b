use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::{self, error::TryRecvError};

use playsync_core::SyncConfig;
use playsync_sync::{run_attempt, AttemptReport, GitCli};

use crate::error::DaemonError;
use crate::logging::init_tracing;

/// Start the scheduler and block the current thread until it exits.
pub fn start_blocking(config: SyncConfig) -> Result<(), DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(DaemonError::Runtime)?;
    runtime.block_on(run(config))
}

/// Run sync attempts every `config.interval_secs` until SIGINT/SIGTERM.
///
/// An in-flight attempt always runs to completion; shutdown is only observed
/// while waiting for the next one.
pub async fn run(config: SyncConfig) -> Result<(), DaemonError> {
    config.validate()?;

    let (shutdown_tx, _) = broadcast::channel::<()>(16);

    let scheduler_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let result = scheduler_task(config, shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let result = signal_task(shutdown.clone(), shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let (scheduler_result, signal_result) = tokio::join!(scheduler_handle, signal_handle);

    handle_join("scheduler", scheduler_result)?;
    handle_join("signal_handler", signal_result)?;
    Ok(())
}

/// Call `attempt`, then wait `interval`, until `shutdown_rx` fires.
///
/// Returns the number of attempts made. A shutdown already pending when the
/// loop starts means no attempt runs at all.
pub async fn run_loop<F, Fut>(
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
    mut attempt: F,
) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut attempts = 0usize;

    loop {
        match shutdown_rx.try_recv() {
            Err(TryRecvError::Empty) => {}
            Ok(()) | Err(TryRecvError::Closed) | Err(TryRecvError::Lagged(_)) => break,
        }

        attempt().await;
        attempts += 1;

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }

    attempts
}

async fn scheduler_task(
    config: SyncConfig,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    let git = Arc::new(GitCli::from_config(&config));
    let config = Arc::new(config);

    tracing::info!(
        source = %config.source_dir.display(),
        repo = %config.repo_dir.display(),
        files = ?config.files,
        interval_secs = config.interval_secs,
        "sync loop started",
    );

    let attempts = run_loop(config.interval(), shutdown_rx, || {
        let config = config.clone();
        let git = git.clone();
        async move {
            run_attempt_blocking(config, git).await;
        }
    })
    .await;

    tracing::info!(attempts, "sync loop stopped");
    Ok(())
}

/// Run one attempt on the blocking pool. Never fails: errors and panics are
/// logged so the loop keeps its cadence.
async fn run_attempt_blocking(config: Arc<SyncConfig>, git: Arc<GitCli>) -> Option<AttemptReport> {
    match tokio::task::spawn_blocking(move || run_attempt(&config, git.as_ref())).await {
        Ok(Some(report)) => {
            tracing::debug!(
                outcome = ?report.outcome,
                copied = report.copied.len(),
                duration_ms = report.duration_ms,
                "sync attempt completed",
            );
            Some(report)
        }
        Ok(None) => None,
        Err(err) => {
            tracing::error!(error = %err, "sync attempt panicked");
            None
        }
    }
}

async fn signal_task(
    shutdown: broadcast::Sender<()>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    tokio::select! {
        _ = shutdown_rx.recv() => Ok(()),
        signal = shutdown_signal() => {
            match signal {
                Ok(name) => {
                    tracing::info!(signal = name, "received signal, shutting down");
                    let _ = shutdown.send(());
                    Ok(())
                }
                Err(err) => Err(DaemonError::Signal(err)),
            }
        }
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "ctrl-c")
}

fn handle_join(
    task: &'static str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(DaemonError::Join {
            task,
            message: err.to_string(),
        }),
    }
}
