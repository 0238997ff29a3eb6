use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::manager::TempAssetManager;

/// Periodically deletes upload sessions that have been idle too long
pub struct SessionSweeper {
    manager: TempAssetManager,
    sweep_interval: Duration,
}

/// Handle to a running sweeper; dropping it leaves the task running
pub struct SweeperHandle {
    cancel_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl SessionSweeper {
    pub fn new(manager: TempAssetManager, sweep_interval: Duration) -> Self {
        Self {
            manager,
            sweep_interval,
        }
    }

    /// Spawn the sweep loop. The first pass runs one interval after start.
    pub fn start(self) -> SweeperHandle {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();

        tracing::info!(
            interval_secs = self.sweep_interval.as_secs(),
            max_idle_secs = self.manager.max_idle().as_secs(),
            "Starting upload session sweeper"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + self.sweep_interval, self.sweep_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        break;
                    }
                    _ = ticker.tick() => {
                        let swept = self.manager.sweep_expired(Utc::now()).await;
                        if swept > 0 {
                            tracing::info!(swept, "Upload session sweep completed");
                        } else {
                            tracing::debug!("Upload session sweep found nothing to remove");
                        }
                    }
                }
            }

            tracing::info!("Upload session sweeper stopped");
        });

        SweeperHandle {
            cancel_token,
            handle,
        }
    }
}

impl SweeperHandle {
    /// Stop the loop and wait for an in-progress sweep to finish
    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Upload session sweeper task failed");
        }
    }
}
