//! Background inactivity sweep scheduler.

use std::{sync::Arc, time::Duration};

use anyhow::{bail, Result};
use tokio::{sync::oneshot, task::JoinHandle, time::MissedTickBehavior};

use super::TicketRuntime;

/// Outcome counters for one sweep cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: u64,
    pub closed: u64,
    pub skipped_missing_channel: u64,
    pub failed: u64,
}

/// Handle to the running sweep task. Dropping it without calling
/// [`AutoCloseHandle::shutdown`] aborts the task.
pub struct AutoCloseHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl AutoCloseHandle {
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                tracing::warn!("auto-close task ended abnormally: {error}");
            }
        }
    }
}

impl Drop for AutoCloseHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns the periodic sweep. The first cycle runs after one full interval,
/// not immediately, so startup panel refreshes finish first.
pub fn start_auto_close_scheduler(
    runtime: Arc<TicketRuntime>,
    interval: Duration,
) -> Result<AutoCloseHandle> {
    if interval.is_zero() {
        bail!("auto-close sweep interval must be non-zero");
    }
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick of a tokio interval fires immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let report = runtime.run_auto_close_cycle().await;
                    if report.closed > 0 || report.failed > 0 {
                        tracing::info!(
                            scanned = report.scanned,
                            closed = report.closed,
                            skipped_missing_channel = report.skipped_missing_channel,
                            failed = report.failed,
                            "auto-close sweep finished"
                        );
                    } else {
                        tracing::debug!(scanned = report.scanned, "auto-close sweep idle");
                    }
                }
            }
        }
    });
    Ok(AutoCloseHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
    })
}
