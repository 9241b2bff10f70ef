//! Periodic sweep of expired rows in durable session backends.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::StoreError;
use crate::stores::SessionSweeper;

/// Configuration for the cleanup job.
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// How often to run a sweep, in seconds
    pub interval_secs: u64,
    /// Whether the job runs at all
    pub enabled: bool,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: 3600, // hourly
            enabled: true,
        }
    }
}

/// Reclaims expired rows on a fixed schedule, independent of request traffic.
///
/// Purely a storage concern: correctness never depends on a sweep having run,
/// and a failed sweep simply retries on the next tick. Deletes are idempotent
/// and order-independent, so a sweep interrupted by shutdown is safe.
pub struct CleanupJob<S: SessionSweeper + 'static> {
    sweeper: Arc<S>,
    config: CleanupConfig,
}

impl<S: SessionSweeper> CleanupJob<S> {
    pub fn new(sweeper: Arc<S>, config: CleanupConfig) -> Self {
        Self { sweeper, config }
    }

    /// Runs one sweep and reports how many rows were deleted.
    pub async fn run_once(&self) -> Result<usize, StoreError> {
        let deleted = self.sweeper.delete_expired().await?;
        info!(deleted, "expired session rows swept");
        Ok(deleted)
    }

    /// Spawns the sweep loop as a background tokio task.
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("session cleanup job is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_secs);

        tokio::spawn(async move {
            info!(interval_secs = self.config.interval_secs, "session cleanup job started");

            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup is quiet.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    error!(error = %e, "session sweep failed; will retry next tick");
                }
            }
        });
    }
}
