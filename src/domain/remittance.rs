//! Remittance entities
//!
//! A remittance is one consolidated outgoing interbank FX settlement
//! instruction, cut from a bucket's accumulator the moment its exposure
//! crosses the per-currency threshold. Immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date_code::SettlementDateCode;
use super::group::RemittanceOrderCurrentGroup;

/// Consolidated outgoing FX settlement instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remittance {
    pub id: Uuid,
    pub currency: String,
    /// Sum of the closed orders' amounts, in minor units.
    pub amount: i64,
    pub system: String,
    pub provider: String,
    pub send_date_code: SettlementDateCode,
    pub receive_date_code: SettlementDateCode,
    pub created_at: DateTime<Utc>,
}

impl Remittance {
    /// Cut a remittance covering a bucket accumulator's full exposure.
    pub fn for_group(group: &RemittanceOrderCurrentGroup) -> Self {
        Self {
            id: Uuid::new_v4(),
            currency: group.bucket.currency.clone(),
            amount: group.group_amount,
            system: group.bucket.system.clone(),
            provider: group.bucket.provider.clone(),
            send_date_code: group.bucket.send_date_code,
            receive_date_code: group.bucket.receive_date_code,
            created_at: Utc::now(),
        }
    }
}

/// Link row establishing which orders a remittance settles.
/// One row per (order, remittance) pair, created at the same moment
/// as the remittance itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceOrderRemittance {
    pub remittance_order_id: Uuid,
    pub remittance_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl RemittanceOrderRemittance {
    pub fn new(remittance_order_id: Uuid, remittance_id: Uuid) -> Self {
        Self {
            remittance_order_id,
            remittance_id,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bucket::SettlementBucket;
    use crate::domain::order::{OrderStatus, RemittanceOrder};

    #[test]
    fn test_remittance_carries_bucket_key_and_full_amount() {
        let bucket = SettlementBucket {
            currency: "EUR".to_string(),
            system: "OTC".to_string(),
            provider: "GENIAL".to_string(),
            send_date_code: SettlementDateCode::new(1),
            receive_date_code: SettlementDateCode::new(2),
        };
        let mut group = RemittanceOrderCurrentGroup::empty(bucket.clone());
        group
            .absorb(&[RemittanceOrder {
                id: Uuid::new_v4(),
                currency: "EUR".to_string(),
                amount: 750_000,
                status: OrderStatus::Open,
                system: "OTC".to_string(),
                provider: "GENIAL".to_string(),
                send_date_code: SettlementDateCode::new(1),
                receive_date_code: SettlementDateCode::new(2),
                created_at: Utc::now(),
            }])
            .unwrap();

        let remittance = Remittance::for_group(&group);

        assert_eq!(remittance.currency, "EUR");
        assert_eq!(remittance.amount, 750_000);
        assert_eq!(remittance.send_date_code, bucket.send_date_code);
        assert_eq!(remittance.receive_date_code, bucket.receive_date_code);
    }

    #[test]
    fn test_link_pairs_order_with_remittance() {
        let order_id = Uuid::new_v4();
        let remittance_id = Uuid::new_v4();

        let link = RemittanceOrderRemittance::new(order_id, remittance_id);

        assert_eq!(link.remittance_order_id, order_id);
        assert_eq!(link.remittance_id, remittance_id);
    }
}
