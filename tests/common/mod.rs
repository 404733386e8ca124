//! Shared test fixtures
//!
//! In-memory doubles for the store and event-sink contracts, with call
//! counters so scenario tests can assert exact interaction counts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use otc_remit::domain::{
    OrderStatus, Remittance, RemittanceExposureRule, RemittanceOrder, RemittanceOrderCurrentGroup,
    RemittanceOrderRemittance, SettlementBucket, SettlementDateCode,
};
use otc_remit::events::{RemittanceEventSink, RemittanceOrderEventSink};
use otc_remit::store::{
    CurrentGroupStore, ExposureRuleStore, Pagination, RemittanceLinkStore, RemittanceOrderStore,
    RemittanceStore, StoreError,
};
use otc_remit::sync::SyncRemittanceOrdersHandler;

// =========================================================================
// Fixture builders
// =========================================================================

pub fn open_order(currency: &str, amount: i64) -> RemittanceOrder {
    RemittanceOrder {
        id: Uuid::new_v4(),
        currency: currency.to_string(),
        amount,
        status: OrderStatus::Open,
        system: "PIX".to_string(),
        provider: "BINANCE".to_string(),
        send_date_code: SettlementDateCode::D0,
        receive_date_code: SettlementDateCode::D0,
        created_at: Utc::now(),
    }
}

pub fn closed_order(currency: &str, amount: i64) -> RemittanceOrder {
    let mut order = open_order(currency, amount);
    order.status = OrderStatus::Closed;
    order
}

pub fn rule(currency: &str, amount: i64) -> RemittanceExposureRule {
    RemittanceExposureRule {
        currency: currency.to_string(),
        amount,
        seconds: 900,
        created_at: Utc::now(),
    }
}

pub fn bucket_for(order: &RemittanceOrder) -> SettlementBucket {
    SettlementBucket::for_order(order)
}

/// A group as it would look after a previous pass persisted it.
pub fn persisted_group(
    bucket: SettlementBucket,
    group_amount: i64,
    order_ids: Vec<Uuid>,
) -> RemittanceOrderCurrentGroup {
    RemittanceOrderCurrentGroup {
        bucket,
        group_amount,
        remittance_order_ids: order_ids,
        version: 1,
        updated_at: Utc::now(),
    }
}

// =========================================================================
// In-memory stores
// =========================================================================

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<Vec<RemittanceOrder>>,
    pub get_all_calls: AtomicUsize,
    pub get_by_id_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
}

impl InMemoryOrderStore {
    pub fn with_orders(orders: Vec<RemittanceOrder>) -> Self {
        Self {
            orders: Mutex::new(orders),
            ..Self::default()
        }
    }

    pub fn get(&self, id: Uuid) -> Option<RemittanceOrder> {
        self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned()
    }
}

#[async_trait]
impl RemittanceOrderStore for InMemoryOrderStore {
    async fn get_all_by_status(
        &self,
        status: OrderStatus,
        page: Pagination,
    ) -> Result<Vec<RemittanceOrder>, StoreError> {
        self.get_all_calls.fetch_add(1, Ordering::SeqCst);

        let matching: Vec<RemittanceOrder> = self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.status == status)
            .cloned()
            .collect();

        let start = page.offset() as usize;
        let end = (start + page.per_page as usize).min(matching.len());
        Ok(matching.get(start..end).unwrap_or_default().to_vec())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<RemittanceOrder>, StoreError> {
        self.get_by_id_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(id))
    }

    async fn update(&self, order: &RemittanceOrder) -> Result<(), StoreError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let mut orders = self.orders.lock().unwrap();
        if let Some(existing) = orders.iter_mut().find(|o| o.id == order.id) {
            *existing = order.clone();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryGroupStore {
    groups: Mutex<HashMap<SettlementBucket, RemittanceOrderCurrentGroup>>,
    pub upsert_calls: AtomicUsize,
    /// When set, every read bumps the stored version after returning it,
    /// simulating a concurrent writer touching the bucket between the
    /// orchestrator's read and its upsert.
    pub bump_version_after_read: std::sync::atomic::AtomicBool,
}

impl InMemoryGroupStore {
    pub fn with_groups(groups: Vec<RemittanceOrderCurrentGroup>) -> Self {
        let map = groups.into_iter().map(|g| (g.bucket.clone(), g)).collect();
        Self {
            groups: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn get(&self, bucket: &SettlementBucket) -> Option<RemittanceOrderCurrentGroup> {
        self.groups.lock().unwrap().get(bucket).cloned()
    }
}

#[async_trait]
impl CurrentGroupStore for InMemoryGroupStore {
    async fn get_group(
        &self,
        bucket: &SettlementBucket,
    ) -> Result<Option<RemittanceOrderCurrentGroup>, StoreError> {
        let mut groups = self.groups.lock().unwrap();
        let read = groups.get(bucket).cloned();

        if read.is_some() && self.bump_version_after_read.load(Ordering::SeqCst) {
            if let Some(stored) = groups.get_mut(bucket) {
                stored.version += 1;
            }
        }

        Ok(read)
    }

    async fn create_or_update(
        &self,
        group: &RemittanceOrderCurrentGroup,
    ) -> Result<(), StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        let mut groups = self.groups.lock().unwrap();

        // Same optimistic check as the Postgres store
        if let Some(existing) = groups.get(&group.bucket) {
            if existing.version != group.version {
                return Err(StoreError::VersionConflict {
                    bucket: group.bucket.to_string(),
                    expected: group.version,
                });
            }
        }

        let mut stored = group.clone();
        stored.version = group.version + 1;
        groups.insert(stored.bucket.clone(), stored);
        Ok(())
    }
}

pub struct InMemoryRuleStore {
    rules: HashMap<String, RemittanceExposureRule>,
}

impl InMemoryRuleStore {
    pub fn with_rules(rules: Vec<RemittanceExposureRule>) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.currency.clone(), r)).collect(),
        }
    }
}

#[async_trait]
impl ExposureRuleStore for InMemoryRuleStore {
    async fn get_by_currency(
        &self,
        currency: &str,
    ) -> Result<Option<RemittanceExposureRule>, StoreError> {
        Ok(self.rules.get(currency).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryRemittanceStore {
    pub created: Mutex<Vec<Remittance>>,
}

#[async_trait]
impl RemittanceStore for InMemoryRemittanceStore {
    async fn create(&self, remittance: &Remittance) -> Result<(), StoreError> {
        self.created.lock().unwrap().push(remittance.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryLinkStore {
    pub links: Mutex<Vec<RemittanceOrderRemittance>>,
}

#[async_trait]
impl RemittanceLinkStore for InMemoryLinkStore {
    async fn create(&self, link: &RemittanceOrderRemittance) -> Result<(), StoreError> {
        self.links.lock().unwrap().push(link.clone());
        Ok(())
    }
}

// =========================================================================
// Recording event sinks
// =========================================================================

#[derive(Default)]
pub struct RecordingOrderSink {
    pub closed: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl RemittanceOrderEventSink for RecordingOrderSink {
    async fn closed_remittance_order(&self, order: &RemittanceOrder) {
        self.closed.lock().unwrap().push(order.id);
    }
}

#[derive(Default)]
pub struct RecordingRemittanceSink {
    pub created: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl RemittanceEventSink for RecordingRemittanceSink {
    async fn created_remittance(&self, remittance: &Remittance) {
        self.created.lock().unwrap().push(remittance.id);
    }
}

// =========================================================================
// Harness
// =========================================================================

/// All collaborators wired into one handler, kept accessible so tests can
/// assert on interactions afterwards.
pub struct Harness {
    pub orders: Arc<InMemoryOrderStore>,
    pub groups: Arc<InMemoryGroupStore>,
    pub remittances: Arc<InMemoryRemittanceStore>,
    pub links: Arc<InMemoryLinkStore>,
    pub order_sink: Arc<RecordingOrderSink>,
    pub remittance_sink: Arc<RecordingRemittanceSink>,
    handler: SyncRemittanceOrdersHandler,
}

impl Harness {
    pub fn build(
        orders: Vec<RemittanceOrder>,
        rules: Vec<RemittanceExposureRule>,
        groups: Vec<RemittanceOrderCurrentGroup>,
    ) -> Self {
        Self::build_with_page_size(orders, rules, groups, 100)
    }

    pub fn build_with_page_size(
        orders: Vec<RemittanceOrder>,
        rules: Vec<RemittanceExposureRule>,
        groups: Vec<RemittanceOrderCurrentGroup>,
        page_size: u32,
    ) -> Self {
        let orders = Arc::new(InMemoryOrderStore::with_orders(orders));
        let groups = Arc::new(InMemoryGroupStore::with_groups(groups));
        let rules = Arc::new(InMemoryRuleStore::with_rules(rules));
        let remittances = Arc::new(InMemoryRemittanceStore::default());
        let links = Arc::new(InMemoryLinkStore::default());
        let order_sink = Arc::new(RecordingOrderSink::default());
        let remittance_sink = Arc::new(RecordingRemittanceSink::default());

        let handler = SyncRemittanceOrdersHandler::new(
            orders.clone(),
            groups.clone(),
            rules,
            remittances.clone(),
            links.clone(),
            order_sink.clone(),
            remittance_sink.clone(),
        )
        .with_page_size(page_size);

        Self {
            orders,
            groups,
            remittances,
            links,
            order_sink,
            remittance_sink,
            handler,
        }
    }

    pub fn handler(&self) -> &SyncRemittanceOrdersHandler {
        &self.handler
    }
}
