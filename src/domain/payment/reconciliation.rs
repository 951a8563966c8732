//! Amount reconciliation policy.
//!
//! Pure decision logic shared by the redirect and webhook paths. Given an
//! order and the provider's claim about a transaction, decide what the order
//! becomes. Side effects are applied by the application layer.

use rust_decimal::Decimal;

use crate::domain::order::Order;

use super::ProviderTransaction;

/// Reason recorded on an order whose payment the provider declined.
pub const DECLINED_REASON: &str = "Payment was declined by Paystack.";

/// Text shown to the customer when the amount paid differs from the total.
pub const AMOUNT_MISMATCH_NOTICE: &str = "Thank you for shopping with us. \
Your payment transaction was successful, but the amount paid is not the same as the total order amount. \
Your order is currently on-hold. \
Kindly contact us for more information regarding your order and payment status.";

/// What should happen to an order after a provider transaction is reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementDecision {
    /// Provider reports the payment did not go through.
    Decline { reason: String },

    /// Paid, but not the order total. Needs a human to look at it.
    HoldForReview {
        reference: String,
        amount_paid: Decimal,
        order_total: Decimal,
    },

    /// Paid in full.
    CompletePayment { reference: String },
}

impl SettlementDecision {
    pub fn kind(&self) -> &'static str {
        match self {
            SettlementDecision::Decline { .. } => "decline",
            SettlementDecision::HoldForReview { .. } => "hold_for_review",
            SettlementDecision::CompletePayment { .. } => "complete_payment",
        }
    }
}

/// Decides the next state of `order` given the provider's transaction.
///
/// Amounts are compared as exact decimals: `450000` minor units is
/// `4500.00`, which differs from a `5000.00` total.
pub fn reconcile(order: &Order, transaction: &ProviderTransaction) -> SettlementDecision {
    if !transaction.is_success() {
        return SettlementDecision::Decline {
            reason: DECLINED_REASON.to_string(),
        };
    }

    let amount_paid = transaction.amount_paid();
    if amount_paid != order.total {
        return SettlementDecision::HoldForReview {
            reference: transaction.reference.clone(),
            amount_paid,
            order_total: order.total,
        };
    }

    SettlementDecision::CompletePayment {
        reference: transaction.reference.clone(),
    }
}

/// Staff-only note explaining why an order was put on hold.
pub fn hold_admin_note(
    currency: &str,
    amount_paid: Decimal,
    order_total: Decimal,
    reference: &str,
) -> String {
    format!(
        "Look into this order. This order is currently on hold. \
Reason: Amount paid is not the same as the total order amount. \
Amount paid was {currency} {amount_paid} while the total order amount is {currency} {order_total}. \
Paystack transaction reference: {reference}"
    )
}

/// Note recording the reference that completed an order.
pub fn payment_note(reference: &str) -> String {
    format!("Paystack transaction reference: {}", reference)
}
