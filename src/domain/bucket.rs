//! Settlement bucket key
//!
//! The grouping unit over which exposure is accumulated: currency plus
//! origin classification plus the send/receive settlement date codes.
//! Orders that differ in any component settle on different interbank
//! cycles and must never share an accumulator.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::date_code::SettlementDateCode;
use super::order::RemittanceOrder;

/// Structural key identifying one exposure accumulator.
///
/// Derives `Ord` so bucket processing within a sync pass has a
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SettlementBucket {
    pub currency: String,
    pub system: String,
    pub provider: String,
    pub send_date_code: SettlementDateCode,
    pub receive_date_code: SettlementDateCode,
}

impl SettlementBucket {
    /// Derive the bucket an order accumulates into.
    pub fn for_order(order: &RemittanceOrder) -> Self {
        Self {
            currency: order.currency.clone(),
            system: order.system.clone(),
            provider: order.provider.clone(),
            send_date_code: order.send_date_code,
            receive_date_code: order.receive_date_code,
        }
    }
}

impl fmt::Display for SettlementBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{};{}",
            self.currency, self.system, self.provider, self.send_date_code, self.receive_date_code
        )
    }
}
