//! Event sinks
//!
//! Fire-and-forget notifications to the rest of the platform: one when an
//! order is closed into a consolidation, one when a remittance is created.
//! The contracts are traits so the orchestrator can be tested with
//! recording doubles; the binary wires in [`TracingEventSink`], which
//! publishes each event as a structured log line with a JSON payload.

use async_trait::async_trait;

use crate::domain::{Remittance, RemittanceOrder};

/// Notified once per order closed by a bucket consolidation.
#[async_trait]
pub trait RemittanceOrderEventSink: Send + Sync {
    async fn closed_remittance_order(&self, order: &RemittanceOrder);
}

/// Notified exactly once per remittance created.
#[async_trait]
pub trait RemittanceEventSink: Send + Sync {
    async fn created_remittance(&self, remittance: &Remittance);
}

/// Sink that publishes events through the tracing pipeline.
#[derive(Debug, Clone, Default)]
pub struct TracingEventSink;

impl TracingEventSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemittanceOrderEventSink for TracingEventSink {
    async fn closed_remittance_order(&self, order: &RemittanceOrder) {
        let payload = serde_json::to_value(order).unwrap_or_default();
        tracing::info!(
            event = "remittance_order.closed",
            order_id = %order.id,
            currency = %order.currency,
            amount = order.amount,
            %payload,
            "Remittance order closed"
        );
    }
}

#[async_trait]
impl RemittanceEventSink for TracingEventSink {
    async fn created_remittance(&self, remittance: &Remittance) {
        let payload = serde_json::to_value(remittance).unwrap_or_default();
        tracing::info!(
            event = "remittance.created",
            remittance_id = %remittance.id,
            currency = %remittance.currency,
            amount = remittance.amount,
            %payload,
            "Remittance created"
        );
    }
}
