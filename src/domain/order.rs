//! Remittance Order entity
//!
//! A single pending FX exposure unit generated by upstream payment flows.
//! Orders are created OPEN by those flows and closed exactly once, only by
//! the sync orchestrator when their bucket's accumulated exposure crosses
//! the per-currency threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::date_code::SettlementDateCode;
use super::error::DomainError;

/// Lifecycle status of a remittance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,
    Closed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Open => "OPEN",
            OrderStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(OrderStatus::Open),
            "CLOSED" => Ok(OrderStatus::Closed),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// One pending foreign-exchange settlement obligation.
///
/// `amount` is a signed integer in the smallest currency unit; summation
/// over amounts never uses floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceOrder {
    pub id: Uuid,
    pub currency: String,
    /// Signed amount in minor units (e.g. cents).
    pub amount: i64,
    pub status: OrderStatus,
    /// Originating system classification (e.g. "PIX", "OTC").
    pub system: String,
    /// Liquidity provider the exposure settles against.
    pub provider: String,
    pub send_date_code: SettlementDateCode,
    pub receive_date_code: SettlementDateCode,
    pub created_at: DateTime<Utc>,
}

impl RemittanceOrder {
    pub fn is_open(&self) -> bool {
        self.status == OrderStatus::Open
    }

    /// Transition OPEN -> CLOSED. Closing twice violates the order
    /// lifecycle and is rejected.
    pub fn close(&mut self) -> Result<(), DomainError> {
        if self.status == OrderStatus::Closed {
            return Err(DomainError::OrderAlreadyClosed(self.id));
        }
        self.status = OrderStatus::Closed;
        Ok(())
    }
}
