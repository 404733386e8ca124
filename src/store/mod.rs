//! Store module
//!
//! Async repository contracts consumed by the sync orchestrator, plus
//! their Postgres implementations. Contracts are traits so integration
//! tests can inject in-memory doubles.

pub mod group_store;
pub mod order_store;
pub mod remittance_store;
pub mod rule_store;

pub use group_store::{CurrentGroupStore, PgCurrentGroupStore};
pub use order_store::{PgRemittanceOrderStore, RemittanceOrderStore};
pub use remittance_store::{
    PgRemittanceLinkStore, PgRemittanceStore, RemittanceLinkStore, RemittanceStore,
};
pub use rule_store::{ExposureRuleStore, PgExposureRuleStore};

use thiserror::Error;

/// Page request for the OPEN-order scan. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn first(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            per_page: self.per_page,
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// Store-layer errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row failed to map back to a domain type.
    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    /// Optimistic-concurrency check failed on a group upsert: another
    /// writer touched the bucket since it was read.
    #[error("Version conflict on bucket {bucket}: expected version {expected}")]
    VersionConflict { bucket: String, expected: i64 },
}
