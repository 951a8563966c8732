//! Read model of a store order as seen by the settlement engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::OrderId;

use super::OrderStatus;

/// A store order.
///
/// The store owns orders; this struct is a snapshot loaded through the
/// `OrderStore` port. Mutations go back through the port, never through
/// this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    /// Order total in the store's major currency unit.
    pub total: Decimal,
    /// ISO 4217 code of the store currency the order was placed in.
    pub currency: String,
    pub billing_email: Option<String>,
    /// Orders with physical goods go to `processing` on payment; purely
    /// virtual orders go straight to `completed`.
    #[serde(default = "default_needs_processing")]
    pub needs_processing: bool,
}

fn default_needs_processing() -> bool {
    true
}

impl Order {
    /// Creates a pending order with physical goods.
    pub fn pending(id: OrderId, total: Decimal, currency: impl Into<String>) -> Self {
        Self {
            id,
            status: OrderStatus::Pending,
            total,
            currency: currency.into(),
            billing_email: None,
            needs_processing: true,
        }
    }

    pub fn with_billing_email(mut self, email: impl Into<String>) -> Self {
        self.billing_email = Some(email.into());
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn virtual_only(mut self) -> Self {
        self.needs_processing = false;
        self
    }

    /// Returns true once a settlement decision has committed.
    pub fn is_already_settled(&self) -> bool {
        self.status.is_settled()
    }

    /// Status the store moves the order to when payment completes.
    pub fn payment_complete_status(&self) -> OrderStatus {
        if self.needs_processing {
            OrderStatus::Processing
        } else {
            OrderStatus::Completed
        }
    }
}
