//! Order status state machine.
//!
//! Mirrors the store's order lifecycle as far as settlement cares about it.
//! The store owns the order; this enum is how the settlement engine reads
//! and requests status changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Status of a store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// Awaiting payment.
    Pending,

    /// Paid but needs a human to look at it (e.g. amount mismatch).
    OnHold,

    /// Paid, goods being prepared.
    Processing,

    /// Paid and fulfilled.
    Completed,

    /// Payment declined or abandoned. The customer may try again.
    Failed,

    /// Cancelled by the customer or an administrator.
    Cancelled,

    /// Money returned to the customer.
    Refunded,
}

impl OrderStatus {
    /// Statuses past which the settlement engine never re-applies a decision.
    pub const SETTLED: [OrderStatus; 3] = [
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::OnHold,
    ];

    /// Returns true once a settlement decision has committed for this order.
    ///
    /// Both entry points consult this immediately after loading the order;
    /// a settled order absorbs every later sighting of a reference.
    pub fn is_settled(&self) -> bool {
        Self::SETTLED.contains(self)
    }

    /// Returns true if transition from self to target is allowed.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use OrderStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, OnHold)
                | (Pending, Processing)
                | (Pending, Completed)
                | (Pending, Failed)
                | (Pending, Cancelled)
            // From FAILED (customer retried)
                | (Failed, Pending)
                | (Failed, OnHold)
                | (Failed, Processing)
                | (Failed, Completed)
                | (Failed, Failed)
                | (Failed, Cancelled)
            // From CANCELLED (late payment still has to be recorded)
                | (Cancelled, OnHold)
                | (Cancelled, Processing)
                | (Cancelled, Completed)
                | (Cancelled, Failed)
            // From ON_HOLD
                | (OnHold, Processing)
                | (OnHold, Completed)
                | (OnHold, Cancelled)
                | (OnHold, Refunded)
            // From PROCESSING
                | (Processing, Completed)
                | (Processing, Cancelled)
                | (Processing, Refunded)
            // From COMPLETED
                | (Completed, Refunded)
        )
    }

    /// Performs transition with validation, returning error if invalid.
    pub fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {} to {}", self, target),
            ))
        }
    }

    /// Returns the store's wire name for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::OnHold => "on-hold",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Failed => "failed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "on-hold" => Ok(OrderStatus::OnHold),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "failed" => Ok(OrderStatus::Failed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            "refunded" => Ok(OrderStatus::Refunded),
            other => Err(ValidationError::invalid_format(
                "order_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}
