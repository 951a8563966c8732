//! Order store port.
//!
//! The storefront owns orders, carts, stock and customer notices. The
//! settlement engine never touches them directly: every read and every
//! mutation goes through this trait, so one implementation can sit on the
//! shop's database and another in memory for tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, OrderId};
use crate::domain::order::{Order, OrderStatus};

/// Port for reading and mutating store orders.
///
/// Implementations are expected to reject status changes the order
/// lifecycle does not allow with `ErrorCode::InvalidStateTransition`.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Load an order snapshot. `Ok(None)` if no such order exists.
    async fn get_order(&self, order_id: OrderId) -> Result<Option<Order>, DomainError>;

    /// Move the order to `status`, recording `note` as the reason.
    async fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        note: &str,
    ) -> Result<(), DomainError>;

    /// Add a note visible to the customer.
    async fn add_customer_note(&self, order_id: OrderId, note: &str) -> Result<(), DomainError>;

    /// Add a note visible to staff only.
    async fn add_admin_note(&self, order_id: OrderId, note: &str) -> Result<(), DomainError>;

    /// Mark the order paid with `transaction_id`.
    ///
    /// The store decides between `processing` and `completed` from the
    /// order's contents and reduces stock as part of completion.
    async fn mark_payment_complete(
        &self,
        order_id: OrderId,
        transaction_id: &str,
    ) -> Result<(), DomainError>;

    /// Record `transaction_id` against the order without completing payment.
    async fn record_transaction_id(
        &self,
        order_id: OrderId,
        transaction_id: &str,
    ) -> Result<(), DomainError>;

    /// Release the stock reserved by the order's line items.
    async fn reduce_reserved_stock(&self, order_id: OrderId) -> Result<(), DomainError>;

    /// Empty the cart the order was placed from.
    async fn clear_active_cart(&self, order_id: OrderId) -> Result<(), DomainError>;

    /// Queue a notice for the customer's next page view.
    async fn add_notice(
        &self,
        order_id: OrderId,
        kind: NoticeKind,
        text: &str,
    ) -> Result<(), DomainError>;

    /// Remember the reference issued when a payment attempt began.
    ///
    /// A later attempt overwrites the earlier one.
    async fn record_pending_reference(
        &self,
        order_id: OrderId,
        reference: &str,
    ) -> Result<(), DomainError>;

    /// The reference recorded by the most recent payment attempt.
    async fn get_pending_reference(&self, order_id: OrderId)
        -> Result<Option<String>, DomainError>;
}

/// Kind of customer notice. Settlement only raises plain notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Notice,
}
