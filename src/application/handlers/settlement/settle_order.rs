//! SettlementEngine - applies a reconciliation decision to an order.
//!
//! Shared by the redirect and webhook handlers. Callers hold the order's
//! lock and have re-read the order before calling `settle`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::order::{Order, OrderStatus};
use crate::domain::payment::reconciliation::{hold_admin_note, payment_note, AMOUNT_MISMATCH_NOTICE};
use crate::domain::payment::{reconcile, ProviderTransaction, SettlementDecision, SettlementError};
use crate::ports::{NoticeKind, OrderStore};

/// What a settlement did to the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Order marked failed.
    Declined,
    /// Order put on hold for an amount mismatch.
    HeldForReview,
    /// Payment recorded as complete.
    Completed,
}

/// Applies settlement decisions through the order store.
pub struct SettlementEngine {
    store: Arc<dyn OrderStore>,
}

impl SettlementEngine {
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Fails with `AlreadySettled` once a decision has committed.
    pub fn ensure_unsettled(order: &Order) -> Result<(), SettlementError> {
        if order.is_already_settled() {
            return Err(SettlementError::AlreadySettled {
                order_id: order.id,
                status: order.status,
            });
        }
        Ok(())
    }

    /// Guard, decide, apply.
    pub async fn settle(
        &self,
        order: &Order,
        transaction: &ProviderTransaction,
    ) -> Result<SettlementOutcome, SettlementError> {
        Self::ensure_unsettled(order)?;

        let decision = reconcile(order, transaction);
        info!(
            order_id = %order.id,
            reference = %transaction.reference,
            decision = decision.kind(),
            amount_minor = transaction.amount_minor,
            order_total = %order.total,
            gateway_response = transaction.gateway_response.as_deref().unwrap_or_default(),
            "Applying settlement decision"
        );

        let outcome = self.apply(order, &decision).await;
        if let Err(e) = &outcome {
            warn!(order_id = %order.id, error = %e, "Settlement side effects failed");
        }
        outcome
    }

    /// Emits side effects in order: status, notes, stock and notice, cart.
    async fn apply(
        &self,
        order: &Order,
        decision: &SettlementDecision,
    ) -> Result<SettlementOutcome, SettlementError> {
        let id = order.id;
        match decision {
            SettlementDecision::Decline { reason } => {
                self.store.set_status(id, OrderStatus::Failed, reason).await?;
                Ok(SettlementOutcome::Declined)
            }
            SettlementDecision::HoldForReview {
                reference,
                amount_paid,
                order_total,
            } => {
                self.store.set_status(id, OrderStatus::OnHold, "").await?;
                self.store.record_transaction_id(id, reference).await?;
                self.store.add_customer_note(id, AMOUNT_MISMATCH_NOTICE).await?;
                self.store
                    .add_admin_note(
                        id,
                        &hold_admin_note(&order.currency, *amount_paid, *order_total, reference),
                    )
                    .await?;
                self.store.reduce_reserved_stock(id).await?;
                self.store
                    .add_notice(id, NoticeKind::Notice, AMOUNT_MISMATCH_NOTICE)
                    .await?;
                self.store.clear_active_cart(id).await?;
                Ok(SettlementOutcome::HeldForReview)
            }
            SettlementDecision::CompletePayment { reference } => {
                self.store.mark_payment_complete(id, reference).await?;
                self.store.add_admin_note(id, &payment_note(reference)).await?;
                self.store.clear_active_cart(id).await?;
                Ok(SettlementOutcome::Completed)
            }
        }
    }
}
