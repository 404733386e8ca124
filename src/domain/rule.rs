//! Remittance exposure rules
//!
//! Per-currency risk configuration owned by the compliance collaborator.
//! Read-only to this service.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-currency policy defining the monetary threshold (and accumulation
/// window) that triggers consolidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceExposureRule {
    pub currency: String,
    /// Exposure threshold in minor units, same unit as order amounts.
    pub amount: i64,
    /// Maximum accumulation window in seconds. Not consulted by the sync
    /// pass itself; kept as the anchor for a time-based force flush.
    pub seconds: i64,
    pub created_at: DateTime<Utc>,
}

impl RemittanceExposureRule {
    /// Threshold comparison. Crossing is inclusive: an accumulated
    /// exposure exactly at the threshold consolidates.
    pub fn is_breached_by(&self, exposure: i64) -> bool {
        exposure >= self.amount
    }

    /// The accumulation window as a duration.
    pub fn max_age(&self) -> Duration {
        Duration::seconds(self.seconds)
    }
}
