//! Remittance and linking stores
//!
//! Persist consolidated remittances and the many-to-many link rows tying
//! each remittance to the orders it settles.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Remittance, RemittanceOrderRemittance};

use super::StoreError;

/// Contract over the remittance collection.
#[async_trait]
pub trait RemittanceStore: Send + Sync {
    async fn create(&self, remittance: &Remittance) -> Result<(), StoreError>;
}

/// Contract over the (order, remittance) link rows.
#[async_trait]
pub trait RemittanceLinkStore: Send + Sync {
    async fn create(&self, link: &RemittanceOrderRemittance) -> Result<(), StoreError>;
}

/// Postgres-backed remittance store.
#[derive(Debug, Clone)]
pub struct PgRemittanceStore {
    pool: PgPool,
}

impl PgRemittanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RemittanceStore for PgRemittanceStore {
    async fn create(&self, remittance: &Remittance) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO remittances (
                id, currency, amount, system, provider,
                send_date_code, receive_date_code, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(remittance.id)
        .bind(&remittance.currency)
        .bind(remittance.amount)
        .bind(&remittance.system)
        .bind(&remittance.provider)
        .bind(remittance.send_date_code.to_string())
        .bind(remittance.receive_date_code.to_string())
        .bind(remittance.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Postgres-backed link store.
#[derive(Debug, Clone)]
pub struct PgRemittanceLinkStore {
    pool: PgPool,
}

impl PgRemittanceLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RemittanceLinkStore for PgRemittanceLinkStore {
    async fn create(&self, link: &RemittanceOrderRemittance) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO remittance_order_remittances (
                remittance_order_id, remittance_id, created_at
            )
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(link.remittance_order_id)
        .bind(link.remittance_id)
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
