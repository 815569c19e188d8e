//! TTL Cleanup Task
//!
//! Background task that periodically removes expired entries from one or
//! more caches. It is never started implicitly: the process (or a test)
//! spawns it and keeps the returned handle to stop it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::Sweep;

// == Cleanup Handle ==
/// Owner of a running cleanup task.
///
/// Dropping the handle leaves the task running; call [`CleanupHandle::shutdown`]
/// or [`CleanupHandle::abort`] to stop it.
#[derive(Debug)]
pub struct CleanupHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CleanupHandle {
    /// Asks the task to stop and waits until it has exited.
    ///
    /// A sweep already in progress completes first.
    pub async fn shutdown(self) {
        // The receiver only disappears once the task has already exited.
        let _ = self.stop_tx.send(true);
        if let Err(err) = self.task.await {
            warn!("Cleanup task ended abnormally: {}", err);
        }
    }

    /// Stops the task without waiting.
    pub fn abort(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns a background task that sweeps every target each `interval`.
///
/// Each sweep goes through the cache's own lock, the same one `get` and
/// `set` use, so it never sees an entry mid-write.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::<String>::new(Duration::from_secs(300));
/// let handle = spawn_cleanup_task(vec![Arc::new(cache.clone())], Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.shutdown().await;
/// ```
pub fn spawn_cleanup_task(targets: Vec<Arc<dyn Sweep>>, interval: Duration) -> CleanupHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task over {} cache(s) with interval of {:?}",
            targets.len(),
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately; skip it so sweeps start one interval in.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stop_rx.changed() => {
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                    continue;
                }
            }

            for target in &targets {
                let removed = target.sweep();
                if removed > 0 {
                    info!(cache = target.name(), "TTL cleanup: removed {} expired entries", removed);
                } else {
                    debug!(cache = target.name(), "TTL cleanup: no expired entries found");
                }
            }
        }

        info!("TTL cleanup task stopped");
    });

    CleanupHandle { stop_tx, task }
}
