// Expiry Sweeper
// Periodic removal of tasks whose deadline has passed

use crate::application::bidding::BiddingService;
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info};

/// Default sweep interval in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Expiry sweeper
///
/// Runs the bidding service's expiry sweep on a fixed interval in the
/// background. A failed sweep is logged and retried only at the next tick.
pub struct ExpirySweeper {
    service: Arc<BiddingService>,
    interval_secs: u64,
}

impl ExpirySweeper {
    /// Create a new sweeper
    ///
    /// # Arguments
    /// * `service` - Bidding service owning the sweep operation
    /// * `interval_secs` - How often to sweep (seconds)
    pub fn new(service: Arc<BiddingService>, interval_secs: u64) -> Self {
        Self {
            service,
            interval_secs,
        }
    }

    /// Run sweep loop (background task)
    ///
    /// Should be spawned in tokio::spawn
    pub async fn run(self) {
        info!(interval_secs = self.interval_secs, "Expiry sweeper started");

        let mut tick = interval(Duration::from_secs(self.interval_secs));

        loop {
            tick.tick().await;

            match self.service.sweep_expired().await {
                Ok(0) => debug!("Sweep found no expired tasks"),
                Ok(removed) => info!(removed, "Sweep removed expired tasks"),
                Err(e) => error!(error = ?e, "Sweep failed"),
            }
        }
    }

    /// Run one sweep immediately (manual trigger)
    pub async fn run_now(&self) -> Result<u64> {
        let removed = self.service.sweep_expired().await?;
        info!(removed, "Manual sweep completed");
        Ok(removed)
    }
}
