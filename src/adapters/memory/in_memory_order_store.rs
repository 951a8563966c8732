//! In-memory order store implementation.
//!
//! This adapter provides an in-memory implementation of the `OrderStore` port.
//! Useful for:
//! - Development and testing environments
//! - Demonstrating the settlement flow without a storefront database
//!
//! Every mutation is recorded so tests can assert exactly which side effects
//! a settlement produced, and how many times.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::{Order, OrderStatus};
use crate::ports::{NoticeKind, OrderStore};

/// Everything that happened to one order.
#[derive(Debug, Clone)]
pub struct OrderActivity {
    pub order: Order,
    /// Status changes with their notes, in order.
    pub status_changes: Vec<(OrderStatus, String)>,
    pub customer_notes: Vec<String>,
    pub admin_notes: Vec<String>,
    pub notices: Vec<(NoticeKind, String)>,
    pub transaction_id: Option<String>,
    pub pending_reference: Option<String>,
    pub payment_completions: u32,
    pub stock_reductions: u32,
    pub cart_clears: u32,
}

impl OrderActivity {
    fn new(order: Order) -> Self {
        Self {
            order,
            status_changes: Vec::new(),
            customer_notes: Vec::new(),
            admin_notes: Vec::new(),
            notices: Vec::new(),
            transaction_id: None,
            pending_reference: None,
            payment_completions: 0,
            stock_reductions: 0,
            cart_clears: 0,
        }
    }

    /// True if nothing beyond the initial insert has been recorded.
    pub fn is_untouched(&self) -> bool {
        self.status_changes.is_empty()
            && self.customer_notes.is_empty()
            && self.admin_notes.is_empty()
            && self.notices.is_empty()
            && self.transaction_id.is_none()
            && self.payment_completions == 0
            && self.stock_reductions == 0
            && self.cart_clears == 0
    }
}

/// In-memory implementation of the OrderStore port.
///
/// Thread-safe via internal `RwLock`. Status changes are checked against the
/// order lifecycle, like a real storefront would.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, OrderActivity>>,
    reads: RwLock<u32>,
    fail_writes: AtomicBool,
}

impl InMemoryOrderStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `orders`.
    pub async fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let store = Self::new();
        for order in orders {
            store.insert(order).await;
        }
        store
    }

    /// Adds or replaces an order, resetting its activity.
    pub async fn insert(&self, order: Order) {
        self.orders
            .write()
            .await
            .insert(order.id, OrderActivity::new(order));
    }

    /// Makes every mutation fail with a database error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// Current snapshot of an order.
    pub async fn order(&self, order_id: OrderId) -> Option<Order> {
        self.orders
            .read()
            .await
            .get(&order_id)
            .map(|a| a.order.clone())
    }

    /// Recorded activity of an order.
    pub async fn activity(&self, order_id: OrderId) -> Option<OrderActivity> {
        self.orders.read().await.get(&order_id).cloned()
    }

    /// Number of `get_order` calls served.
    pub async fn read_count(&self) -> u32 {
        *self.reads.read().await
    }

    async fn with_order<T>(
        &self,
        order_id: OrderId,
        f: impl FnOnce(&mut OrderActivity) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "order store unavailable",
            ));
        }
        let mut orders = self.orders.write().await;
        let activity = orders.get_mut(&order_id).ok_or_else(|| {
            DomainError::new(ErrorCode::OrderNotFound, format!("Order {} not found", order_id))
        })?;
        f(activity)
    }
}

fn transition(activity: &mut OrderActivity, status: OrderStatus) -> Result<(), DomainError> {
    let next = activity.order.status.transition_to(status).map_err(|e| {
        DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
            .with_detail("order_id", activity.order.id.to_string())
    })?;
    activity.order.status = next;
    Ok(())
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, DomainError> {
        *self.reads.write().await += 1;
        Ok(self.order(order_id).await)
    }

    async fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        note: &str,
    ) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            transition(a, status)?;
            a.status_changes.push((status, note.to_string()));
            Ok(())
        })
        .await
    }

    async fn add_customer_note(&self, order_id: OrderId, note: &str) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.customer_notes.push(note.to_string());
            Ok(())
        })
        .await
    }

    async fn add_admin_note(&self, order_id: OrderId, note: &str) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.admin_notes.push(note.to_string());
            Ok(())
        })
        .await
    }

    async fn mark_payment_complete(
        &self,
        order_id: OrderId,
        transaction_id: &str,
    ) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            let status = a.order.payment_complete_status();
            transition(a, status)?;
            a.status_changes.push((status, String::new()));
            a.transaction_id = Some(transaction_id.to_string());
            a.payment_completions += 1;
            a.stock_reductions += 1;
            Ok(())
        })
        .await
    }

    async fn record_transaction_id(
        &self,
        order_id: OrderId,
        transaction_id: &str,
    ) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.transaction_id = Some(transaction_id.to_string());
            Ok(())
        })
        .await
    }

    async fn reduce_reserved_stock(&self, order_id: OrderId) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.stock_reductions += 1;
            Ok(())
        })
        .await
    }

    async fn clear_active_cart(&self, order_id: OrderId) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.cart_clears += 1;
            Ok(())
        })
        .await
    }

    async fn add_notice(
        &self,
        order_id: OrderId,
        kind: NoticeKind,
        text: &str,
    ) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.notices.push((kind, text.to_string()));
            Ok(())
        })
        .await
    }

    async fn record_pending_reference(
        &self,
        order_id: OrderId,
        reference: &str,
    ) -> Result<(), DomainError> {
        self.with_order(order_id, |a| {
            a.pending_reference = Some(reference.to_string());
            Ok(())
        })
        .await
    }

    async fn get_pending_reference(
        &self,
        order_id: OrderId,
    ) -> Result<Option<String>, DomainError> {
        Ok(self
            .orders
            .read()
            .await
            .get(&order_id)
            .and_then(|a| a.pending_reference.clone()))
    }
}
