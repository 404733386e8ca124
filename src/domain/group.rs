//! Current group accumulator
//!
//! The persisted running total of un-remitted exposure for one settlement
//! bucket, plus the identities of the orders contributing to it.
//!
//! Invariant: `group_amount` always equals the sum of the amounts of the
//! tracked orders. The group is created lazily on the first order seen for
//! a bucket, grows monotonically across sync passes, and is reset to
//! zero/empty the instant a remittance is created from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bucket::SettlementBucket;
use super::error::DomainError;
use super::order::RemittanceOrder;
use super::rule::RemittanceExposureRule;

/// Decision for a bucket after merging newly-seen orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Below threshold: persist the grown group, touch nothing else.
    Accumulate,
    /// Threshold crossed: close tracked orders, cut one remittance,
    /// reset the group.
    Consolidate,
}

/// Accumulator cache entry for one settlement bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceOrderCurrentGroup {
    pub bucket: SettlementBucket,
    /// Sum of the amounts of all tracked orders, in minor units.
    pub group_amount: i64,
    /// Ids of the OPEN orders currently tracked and not yet remitted.
    pub remittance_order_ids: Vec<Uuid>,
    /// Optimistic-concurrency version, bumped by the store on every
    /// persisted write. 0 means never persisted.
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl RemittanceOrderCurrentGroup {
    /// Fresh, empty accumulator for a bucket.
    pub fn empty(bucket: SettlementBucket) -> Self {
        Self {
            bucket,
            group_amount: 0,
            remittance_order_ids: Vec::new(),
            version: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn is_tracking(&self, order_id: Uuid) -> bool {
        self.remittance_order_ids.contains(&order_id)
    }

    /// Merge newly-seen orders into the accumulator.
    ///
    /// Orders already tracked are skipped, so re-reading the same OPEN
    /// order across passes never double-counts. Summation is checked;
    /// overflow surfaces as a domain error rather than wrapping.
    pub fn absorb(&mut self, orders: &[RemittanceOrder]) -> Result<(), DomainError> {
        for order in orders {
            if self.is_tracking(order.id) {
                continue;
            }

            self.group_amount = self.group_amount.checked_add(order.amount).ok_or_else(|| {
                DomainError::ExposureOverflow {
                    bucket: self.bucket.to_string(),
                }
            })?;
            self.remittance_order_ids.push(order.id);
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Decide the bucket's fate against its currency's exposure rule.
    pub fn outcome(&self, rule: &RemittanceExposureRule) -> GroupOutcome {
        if rule.is_breached_by(self.group_amount) {
            GroupOutcome::Consolidate
        } else {
            GroupOutcome::Accumulate
        }
    }

    /// Clear the accumulator after its remittance has been cut.
    pub fn reset(&mut self) {
        self.group_amount = 0;
        self.remittance_order_ids.clear();
        self.updated_at = Utc::now();
    }
}
