//! Current group (accumulator) store
//!
//! Persists the per-bucket running exposure total and tracked order ids.
//! Upserts carry an optimistic-concurrency version check so two writers
//! can never both grow (or both reset) the same bucket from a stale read;
//! the loser gets a `VersionConflict` and the pass is retried on the next
//! scheduler tick.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{RemittanceOrderCurrentGroup, SettlementBucket, SettlementDateCode};

use super::StoreError;

/// Contract over the accumulator cache.
#[async_trait]
pub trait CurrentGroupStore: Send + Sync {
    async fn get_group(
        &self,
        bucket: &SettlementBucket,
    ) -> Result<Option<RemittanceOrderCurrentGroup>, StoreError>;

    /// Upsert by bucket key. The group's `version` must match the
    /// persisted row (or be 0 for a row that doesn't exist yet); the
    /// stored version is bumped on success.
    async fn create_or_update(
        &self,
        group: &RemittanceOrderCurrentGroup,
    ) -> Result<(), StoreError>;
}

/// Postgres-backed accumulator store.
#[derive(Debug, Clone)]
pub struct PgCurrentGroupStore {
    pool: PgPool,
}

type GroupRow = (String, String, i64, Vec<Uuid>, i64, DateTime<Utc>);

impl PgCurrentGroupStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CurrentGroupStore for PgCurrentGroupStore {
    async fn get_group(
        &self,
        bucket: &SettlementBucket,
    ) -> Result<Option<RemittanceOrderCurrentGroup>, StoreError> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"
            SELECT send_date_code, receive_date_code, group_amount,
                   remittance_order_ids, version, updated_at
            FROM remittance_order_current_groups
            WHERE currency = $1 AND system = $2 AND provider = $3
              AND send_date_code = $4 AND receive_date_code = $5
            "#,
        )
        .bind(&bucket.currency)
        .bind(&bucket.system)
        .bind(&bucket.provider)
        .bind(bucket.send_date_code.to_string())
        .bind(bucket.receive_date_code.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some((send_code, receive_code, group_amount, order_ids, version, updated_at)) = row
        else {
            return Ok(None);
        };

        let send_date_code: SettlementDateCode = send_code
            .parse()
            .map_err(|e: crate::domain::DomainError| StoreError::CorruptRow(e.to_string()))?;
        let receive_date_code: SettlementDateCode = receive_code
            .parse()
            .map_err(|e: crate::domain::DomainError| StoreError::CorruptRow(e.to_string()))?;

        Ok(Some(RemittanceOrderCurrentGroup {
            bucket: SettlementBucket {
                currency: bucket.currency.clone(),
                system: bucket.system.clone(),
                provider: bucket.provider.clone(),
                send_date_code,
                receive_date_code,
            },
            group_amount,
            remittance_order_ids: order_ids,
            version,
            updated_at,
        }))
    }

    async fn create_or_update(
        &self,
        group: &RemittanceOrderCurrentGroup,
    ) -> Result<(), StoreError> {
        let bucket = &group.bucket;

        let rows_affected = sqlx::query(
            r#"
            INSERT INTO remittance_order_current_groups (
                currency, system, provider, send_date_code, receive_date_code,
                group_amount, remittance_order_ids, version, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8 + 1, NOW())
            ON CONFLICT (currency, system, provider, send_date_code, receive_date_code)
            DO UPDATE SET
                group_amount = $6,
                remittance_order_ids = $7,
                version = remittance_order_current_groups.version + 1,
                updated_at = NOW()
            WHERE remittance_order_current_groups.version = $8
            "#,
        )
        .bind(&bucket.currency)
        .bind(&bucket.system)
        .bind(&bucket.provider)
        .bind(bucket.send_date_code.to_string())
        .bind(bucket.receive_date_code.to_string())
        .bind(group.group_amount)
        .bind(&group.remittance_order_ids)
        .bind(group.version)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::VersionConflict {
                bucket: bucket.to_string(),
                expected: group.version,
            });
        }

        Ok(())
    }
}
