//! Domain module
//!
//! Core domain types and business logic for exposure netting.

pub mod bucket;
pub mod date_code;
pub mod error;
pub mod group;
pub mod order;
pub mod remittance;
pub mod rule;

pub use bucket::SettlementBucket;
pub use date_code::SettlementDateCode;
pub use error::DomainError;
pub use group::{GroupOutcome, RemittanceOrderCurrentGroup};
pub use order::{OrderStatus, RemittanceOrder};
pub use remittance::{Remittance, RemittanceOrderRemittance};
pub use rule::RemittanceExposureRule;
