//! Scheduled Jobs
//!
//! The periodic trigger driving the sync orchestrator. Retry policy lives
//! here, not in the core: a failed pass is logged and retried on the next
//! tick, which is safe because accumulation is idempotent and resumable.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::sync::{SyncError, SyncRemittanceOrdersHandler, SyncReport};

/// Runs the consolidation pass on a fixed interval.
///
/// One scheduler task per process; the single task is what guarantees
/// passes never overlap (single-flight execution).
pub struct SyncScheduler {
    handler: Arc<SyncRemittanceOrdersHandler>,
    period: Duration,
}

impl SyncScheduler {
    pub fn new(handler: Arc<SyncRemittanceOrdersHandler>, period: Duration) -> Self {
        Self { handler, period }
    }

    /// Start the scheduler in the background.
    /// Returns a handle that can be used to abort it.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        tracing::info!(period_secs = self.period.as_secs(), "Sync scheduler started");

        let mut ticker = interval(self.period);
        // Skip missed ticks rather than bursting after a slow pass.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match self.run_once().await {
                Ok(report) => {
                    if report.open_orders_seen > 0 {
                        tracing::info!(
                            open_orders_seen = report.open_orders_seen,
                            buckets_touched = report.buckets_touched,
                            orders_closed = report.orders_closed,
                            remittances_created = report.remittances_created,
                            "Sync pass completed"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Sync pass failed, will retry on next tick");
                }
            }
        }
    }

    /// Run a single pass (for manual trigger or testing).
    pub async fn run_once(&self) -> Result<SyncReport, SyncError> {
        self.handler.execute().await
    }
}
