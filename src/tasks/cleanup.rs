//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::Shared;

// == Cleanup Handle ==
/// Owner side of a running cleanup task.
///
/// Dropping the handle drops the shutdown sender, which also ends the task.
#[derive(Debug)]
pub struct CleanupHandle {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl CleanupHandle {
    /// Signals the task to stop and waits for it to exit.
    ///
    /// A sweep already in progress completes first.
    pub async fn stop(self) {
        // Err means the task already exited and dropped its receiver.
        let _ = self.shutdown_tx.send(true);
        if let Err(err) = self.handle.await {
            warn!("TTL cleanup task ended abnormally: {}", err);
        }
        info!("TTL cleanup task stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The first sweep happens one full `interval` after spawning. Each sweep
/// holds the store's write lock for its whole pass, firing Delete hooks for
/// every reaped entry before releasing it.
///
/// # Panics
/// Panics if `interval` is zero or no Tokio runtime is running.
pub(crate) fn spawn_cleanup_task<V>(shared: Arc<Shared<V>>, interval: Duration) -> CleanupHandle
where
    V: Send + Sync + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn(async move {
        info!("Starting TTL cleanup task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = shared.sweep().await;
                    if removed > 0 {
                        debug!("TTL cleanup: removed {} expired entries", removed);
                    }
                }
                changed = shutdown_rx.changed() => {
                    // Err: every handle was dropped along with the sender.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        debug!("TTL cleanup task exiting");
    });

    CleanupHandle {
        shutdown_tx,
        handle,
    }
}
