//! Periodic cleanup of stale viewer records

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::presence::PresenceService;

/// Runs `cleanup_stale_viewers` on a fixed interval until shut down
pub struct ViewerReaper {
    ctx: Arc<ServiceContext>,
    interval: Duration,
}

impl ViewerReaper {
    /// # Errors
    /// * `Validation` - the interval is zero
    pub fn new(ctx: Arc<ServiceContext>, interval: Duration) -> ServiceResult<Self> {
        if interval.is_zero() {
            return Err(ServiceError::validation("reap interval must be positive"));
        }
        Ok(Self { ctx, interval })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the sweep loop; it stops once `shutdown` turns `true` or its sender is dropped
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let max = self.ctx.windows().max_sweep_interval();
        if max.to_std().is_ok_and(|max| self.interval > max) {
            warn!(
                interval_ms = self.interval.as_millis(),
                max_interval_ms = max.num_milliseconds(),
                "Reap interval exceeds the gap between the active and reap windows"
            );
        }
        info!(interval_ms = self.interval.as_millis(), "Viewer reaper started");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = PresenceService::new(&self.ctx).cleanup_stale_viewers().await {
                        error!(error = %e, "Viewer reap failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Viewer reaper stopped");
    }
}
