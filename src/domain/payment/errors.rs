//! Settlement error taxonomy.
//!
//! Every way a redirect or webhook can fail to settle an order. The HTTP
//! layer decides what the caller sees; these variants carry the internal
//! reason for logs only.
//!
//! # Webhook Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Store | 500 (provider retries) |
//! | everything else | 200, empty body |

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId};
use crate::domain::order::OrderStatus;

/// Errors that occur while reconciling a provider transaction with an order.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    /// The reference does not have the `<order_id>_<nonce>` shape.
    #[error("Malformed transaction reference: {0}")]
    MalformedReference(String),

    /// Webhook signature missing or wrong.
    #[error("Webhook authenticity check failed")]
    AuthenticityFailure,

    /// Provider call failed, timed out, or returned a non-2xx status.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider answered with something that is not a transaction record.
    #[error("Response parse error: {0}")]
    ResponseParse(String),

    /// Signed reference differs from the one recorded when payment began.
    #[error("Reference does not match the pending reference for order {order_id}")]
    ReplayOrMismatch { order_id: OrderId },

    /// Order already carries a settlement decision. Not a failure.
    #[error("Order {order_id} already settled ({status})")]
    AlreadySettled {
        order_id: OrderId,
        status: OrderStatus,
    },

    /// Webhook event type this service does not act on.
    #[error("Event ignored: {0}")]
    IgnoredEvent(String),

    /// The reference points at an order the store does not know.
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    /// The store refuses the status change the decision requires.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Gateway disabled, keys missing, or store currency unsupported.
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// The order cannot be paid for as it stands (no email, fractional
    /// minor amount, unsupported currency).
    #[error("Checkout rejected: {0}")]
    CheckoutRejected(String),

    /// Order store failure.
    #[error("Store error: {0}")]
    Store(String),
}

impl SettlementError {
    pub fn malformed_reference(reason: impl Into<String>) -> Self {
        SettlementError::MalformedReference(reason.into())
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        SettlementError::Transport(reason.into())
    }

    pub fn response_parse(reason: impl Into<String>) -> Self {
        SettlementError::ResponseParse(reason.into())
    }

    /// Returns true if the provider should redeliver the webhook.
    ///
    /// Only store failures qualify: every other outcome is final for the
    /// signal that produced it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SettlementError::Store(_))
    }

    /// Returns true for outcomes that are acknowledgements rather than faults.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            SettlementError::AlreadySettled { .. } | SettlementError::IgnoredEvent(_)
        )
    }

    /// Status code returned to the provider for a webhook that did not settle.
    ///
    /// Rejections are uniform so a caller cannot tell which check failed.
    pub fn webhook_status_code(&self) -> StatusCode {
        if self.is_retryable() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }
}

impl From<DomainError> for SettlementError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidStateTransition => SettlementError::InvalidTransition(err.message),
            _ => SettlementError::Store(err.to_string()),
        }
    }
}
