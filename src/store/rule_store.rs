//! Exposure rule store
//!
//! Read-only lookup of the per-currency exposure configuration, owned by
//! the compliance collaborator.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::RemittanceExposureRule;

use super::StoreError;

/// Contract over the exposure rule configuration.
#[async_trait]
pub trait ExposureRuleStore: Send + Sync {
    async fn get_by_currency(
        &self,
        currency: &str,
    ) -> Result<Option<RemittanceExposureRule>, StoreError>;
}

/// Postgres-backed exposure rule store.
#[derive(Debug, Clone)]
pub struct PgExposureRuleStore {
    pool: PgPool,
}

impl PgExposureRuleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExposureRuleStore for PgExposureRuleStore {
    async fn get_by_currency(
        &self,
        currency: &str,
    ) -> Result<Option<RemittanceExposureRule>, StoreError> {
        let row: Option<(String, i64, i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT currency, amount, seconds, created_at
            FROM remittance_exposure_rules
            WHERE currency = $1
            "#,
        )
        .bind(currency)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(currency, amount, seconds, created_at)| RemittanceExposureRule {
            currency,
            amount,
            seconds,
            created_at,
        }))
    }
}
