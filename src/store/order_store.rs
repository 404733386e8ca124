//! Remittance order store
//!
//! Source of pending OPEN orders and their amounts; also used to re-fetch
//! and close tracked orders when a bucket consolidates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{OrderStatus, RemittanceOrder, SettlementDateCode};

use super::{Pagination, StoreError};

/// Contract over the remittance order collection.
#[async_trait]
pub trait RemittanceOrderStore: Send + Sync {
    /// Fetch one page of orders in the given status, oldest first.
    async fn get_all_by_status(
        &self,
        status: OrderStatus,
        page: Pagination,
    ) -> Result<Vec<RemittanceOrder>, StoreError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<RemittanceOrder>, StoreError>;

    /// Persist a status change.
    async fn update(&self, order: &RemittanceOrder) -> Result<(), StoreError>;
}

/// Postgres-backed order store.
#[derive(Debug, Clone)]
pub struct PgRemittanceOrderStore {
    pool: PgPool,
}

type OrderRow = (
    Uuid,
    String,
    i64,
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
);

impl PgRemittanceOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: OrderRow) -> Result<RemittanceOrder, StoreError> {
        let (id, currency, amount, status, system, provider, send_code, receive_code, created_at) =
            row;

        let status: OrderStatus = status.parse().map_err(StoreError::CorruptRow)?;
        let send_date_code: SettlementDateCode = send_code
            .parse()
            .map_err(|e: crate::domain::DomainError| StoreError::CorruptRow(e.to_string()))?;
        let receive_date_code: SettlementDateCode = receive_code
            .parse()
            .map_err(|e: crate::domain::DomainError| StoreError::CorruptRow(e.to_string()))?;

        Ok(RemittanceOrder {
            id,
            currency,
            amount,
            status,
            system,
            provider,
            send_date_code,
            receive_date_code,
            created_at,
        })
    }
}

#[async_trait]
impl RemittanceOrderStore for PgRemittanceOrderStore {
    async fn get_all_by_status(
        &self,
        status: OrderStatus,
        page: Pagination,
    ) -> Result<Vec<RemittanceOrder>, StoreError> {
        let rows: Vec<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, currency, amount, status, system, provider,
                   send_date_code, receive_date_code, created_at
            FROM remittance_orders
            WHERE status = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::map_row).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<RemittanceOrder>, StoreError> {
        let row: Option<OrderRow> = sqlx::query_as(
            r#"
            SELECT id, currency, amount, status, system, provider,
                   send_date_code, receive_date_code, created_at
            FROM remittance_orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::map_row).transpose()
    }

    async fn update(&self, order: &RemittanceOrder) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE remittance_orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
