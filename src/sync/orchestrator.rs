//! Sync Orchestrator
//!
//! Consolidates pending FX exposure into batched interbank remittances.
//! One pass scans every OPEN remittance order and grows the per-bucket
//! accumulators. When a bucket's total crosses its currency's exposure
//! threshold, the pass closes the tracked orders, cuts one remittance,
//! links it to every closed order, emits the events, and resets the
//! accumulator.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{
    DomainError, GroupOutcome, OrderStatus, Remittance, RemittanceOrder,
    RemittanceOrderCurrentGroup, RemittanceOrderRemittance, SettlementBucket,
};
use crate::events::{RemittanceEventSink, RemittanceOrderEventSink};
use crate::store::{
    CurrentGroupStore, ExposureRuleStore, Pagination, RemittanceLinkStore, RemittanceOrderStore,
    RemittanceStore, StoreError,
};

/// Default page size for the OPEN-order scan.
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Errors a sync pass can surface. The first error aborts the whole pass;
/// partial progress is safe because the accumulators are persisted
/// incrementally and absorbing an already-tracked order is a no-op.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Summary of one sync pass, for the job layer to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub open_orders_seen: usize,
    pub buckets_touched: usize,
    pub orders_closed: usize,
    pub remittances_created: usize,
}

/// The consolidation use case.
///
/// Collaborators are injected as trait objects; tests wire in counting
/// in-memory doubles, the binary wires in the Postgres stores. Within one
/// pass buckets are processed sequentially in key order, so accumulator
/// read-modify-write is never concurrent for the same bucket. Across
/// passes the optimistic version check on the group store rejects writes
/// from a stale read.
pub struct SyncRemittanceOrdersHandler {
    orders: Arc<dyn RemittanceOrderStore>,
    groups: Arc<dyn CurrentGroupStore>,
    rules: Arc<dyn ExposureRuleStore>,
    remittances: Arc<dyn RemittanceStore>,
    links: Arc<dyn RemittanceLinkStore>,
    order_events: Arc<dyn RemittanceOrderEventSink>,
    remittance_events: Arc<dyn RemittanceEventSink>,
    page_size: u32,
}

impl SyncRemittanceOrdersHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        orders: Arc<dyn RemittanceOrderStore>,
        groups: Arc<dyn CurrentGroupStore>,
        rules: Arc<dyn ExposureRuleStore>,
        remittances: Arc<dyn RemittanceStore>,
        links: Arc<dyn RemittanceLinkStore>,
        order_events: Arc<dyn RemittanceOrderEventSink>,
        remittance_events: Arc<dyn RemittanceEventSink>,
    ) -> Self {
        Self {
            orders,
            groups,
            rules,
            remittances,
            links,
            order_events,
            remittance_events,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Run one consolidation pass over all currently OPEN orders.
    pub async fn execute(&self) -> Result<SyncReport, SyncError> {
        let open_orders = self.fetch_all_open().await?;

        let mut report = SyncReport {
            open_orders_seen: open_orders.len(),
            ..SyncReport::default()
        };

        if open_orders.is_empty() {
            tracing::debug!("No open remittance orders, nothing to consolidate");
            return Ok(report);
        }

        let buckets = partition_by_bucket(open_orders);
        report.buckets_touched = buckets.len();

        for (bucket, orders) in buckets {
            self.process_bucket(bucket, orders, &mut report).await?;
        }

        Ok(report)
    }

    /// Drain the OPEN-order scan page by page until a short page.
    async fn fetch_all_open(&self) -> Result<Vec<RemittanceOrder>, SyncError> {
        let mut all = Vec::new();
        let mut page = Pagination::first(self.page_size);

        loop {
            let batch = self
                .orders
                .get_all_by_status(OrderStatus::Open, page)
                .await?;
            let batch_len = batch.len();
            all.extend(batch);

            if batch_len < self.page_size as usize {
                break;
            }
            page = page.next();
        }

        Ok(all)
    }

    async fn process_bucket(
        &self,
        bucket: SettlementBucket,
        orders: Vec<RemittanceOrder>,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let mut group = self
            .groups
            .get_group(&bucket)
            .await?
            .unwrap_or_else(|| RemittanceOrderCurrentGroup::empty(bucket.clone()));

        group.absorb(&orders)?;

        // Exposure policy is mandatory. A missing rule is a configuration
        // defect that aborts the whole pass rather than skipping a bucket.
        let rule = self
            .rules
            .get_by_currency(&bucket.currency)
            .await?
            .ok_or_else(|| DomainError::rule_not_found(&bucket.currency))?;

        match group.outcome(&rule) {
            GroupOutcome::Accumulate => {
                tracing::debug!(
                    bucket = %bucket,
                    group_amount = group.group_amount,
                    threshold = rule.amount,
                    tracked_orders = group.remittance_order_ids.len(),
                    "Exposure below threshold, accumulating"
                );
                self.groups.create_or_update(&group).await?;
            }
            GroupOutcome::Consolidate => {
                self.consolidate(&bucket, group, report).await?;
            }
        }

        Ok(())
    }

    /// Threshold crossed: close every tracked order, cut one remittance
    /// covering the bucket's full exposure, link it to each order, emit
    /// the events, and reset the accumulator.
    async fn consolidate(
        &self,
        bucket: &SettlementBucket,
        mut group: RemittanceOrderCurrentGroup,
        report: &mut SyncReport,
    ) -> Result<(), SyncError> {
        let tracked_ids = group.remittance_order_ids.clone();

        let mut orders_closed = 0;
        for id in &tracked_ids {
            let mut order = self
                .orders
                .get_by_id(*id)
                .await?
                .ok_or(DomainError::TrackedOrderMissing(*id))?;

            // A tracked order that is already CLOSED was closed by a pass
            // that crashed before resetting the accumulator. It still
            // belongs to this consolidation (its amount is in the group
            // total), but must not be re-closed or re-announced.
            if !order.is_open() {
                tracing::warn!(
                    order_id = %order.id,
                    bucket = %bucket,
                    "Tracked order already closed by an interrupted pass, settling without re-closing"
                );
                continue;
            }

            order.close()?;
            self.orders.update(&order).await?;
            self.order_events.closed_remittance_order(&order).await;
            orders_closed += 1;
        }
        report.orders_closed += orders_closed;

        let remittance = Remittance::for_group(&group);
        self.remittances.create(&remittance).await?;

        for id in &tracked_ids {
            let link = RemittanceOrderRemittance::new(*id, remittance.id);
            self.links.create(&link).await?;
        }

        self.remittance_events.created_remittance(&remittance).await;
        report.remittances_created += 1;

        group.reset();
        self.groups.create_or_update(&group).await?;

        tracing::info!(
            bucket = %bucket,
            remittance_id = %remittance.id,
            amount = remittance.amount,
            orders_closed,
            orders_linked = tracked_ids.len(),
            "Consolidated exposure into remittance"
        );

        Ok(())
    }
}

/// Partition orders into their settlement buckets, in deterministic key
/// order.
fn partition_by_bucket(
    orders: Vec<RemittanceOrder>,
) -> BTreeMap<SettlementBucket, Vec<RemittanceOrder>> {
    let mut buckets: BTreeMap<SettlementBucket, Vec<RemittanceOrder>> = BTreeMap::new();
    for order in orders {
        let bucket = SettlementBucket::for_order(&order);
        buckets.entry(bucket).or_default().push(order);
    }
    buckets
}
