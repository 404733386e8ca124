//! otc_remit Library
//!
//! Re-exports modules for integration testing and external use.

pub mod config;
pub mod db;
pub mod domain;
pub mod events;
pub mod jobs;
pub mod store;
pub mod sync;

pub use config::Config;
pub use domain::{
    DomainError, GroupOutcome, OrderStatus, Remittance, RemittanceExposureRule, RemittanceOrder,
    RemittanceOrderCurrentGroup, RemittanceOrderRemittance, SettlementBucket, SettlementDateCode,
};
pub use sync::{SyncError, SyncRemittanceOrdersHandler, SyncReport};
