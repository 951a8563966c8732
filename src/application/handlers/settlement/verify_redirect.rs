//! VerifyRedirectHandler - settles an order when the customer returns from
//! the payment page.
//!
//! The query string is untrusted: the handler only uses it to find the
//! reference, then asks the provider what actually happened. Whatever the
//! outcome, the customer gets a redirect, never an error page.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::OrderId;
use crate::domain::payment::{SettlementError, TransactionReference};
use crate::ports::{OrderStore, PaymentProvider};

use super::order_locks::OrderLocks;
use super::settle_order::{SettlementEngine, SettlementOutcome};

/// Command carrying the reference from the redirect query string.
#[derive(Debug, Clone)]
pub struct VerifyRedirectCommand {
    pub reference: Option<String>,
}

/// Where to send the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// The order-received page.
    OrderReturn(OrderId),
    /// The cart, when no order could be identified.
    Cart,
}

/// Handler for the customer redirect-back.
pub struct VerifyRedirectHandler {
    store: Arc<dyn OrderStore>,
    provider: Arc<dyn PaymentProvider>,
    locks: Arc<OrderLocks>,
    engine: SettlementEngine,
}

impl VerifyRedirectHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        provider: Arc<dyn PaymentProvider>,
        locks: Arc<OrderLocks>,
    ) -> Self {
        Self {
            engine: SettlementEngine::new(store.clone()),
            store,
            provider,
            locks,
        }
    }

    /// Settles if possible and picks the redirect target.
    pub async fn handle(&self, cmd: VerifyRedirectCommand) -> RedirectTarget {
        let Some(raw) = cmd.reference.filter(|r| !r.trim().is_empty()) else {
            debug!("Redirect without reference");
            return RedirectTarget::Cart;
        };

        let reference = match TransactionReference::decode(&raw) {
            Ok(reference) => reference,
            Err(e) => {
                warn!(reference = %raw, error = %e, "Rejected redirect reference");
                return RedirectTarget::Cart;
            }
        };

        match self.settle(&raw, &reference).await {
            Ok(outcome) => {
                info!(order_id = %reference.order_id(), reference = %raw, ?outcome, "Redirect settled order");
                RedirectTarget::OrderReturn(reference.order_id())
            }
            Err(SettlementError::OrderNotFound(order_id)) => {
                warn!(order_id = %order_id, reference = %raw, "Redirect for unknown order");
                RedirectTarget::Cart
            }
            Err(e) if e.is_benign() => {
                debug!(order_id = %reference.order_id(), reason = %e, "Redirect found nothing to do");
                RedirectTarget::OrderReturn(reference.order_id())
            }
            Err(e) => {
                warn!(order_id = %reference.order_id(), reference = %raw, error = %e, "Redirect did not settle order");
                RedirectTarget::OrderReturn(reference.order_id())
            }
        }
    }

    /// Runs the settlement protocol for a decoded reference.
    ///
    /// Cheap unlocked guard, remote fetch outside the lock, then lock,
    /// re-read, guard again, apply.
    pub async fn settle(
        &self,
        raw_reference: &str,
        reference: &TransactionReference,
    ) -> Result<SettlementOutcome, SettlementError> {
        let order_id = reference.order_id();

        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(SettlementError::OrderNotFound(order_id))?;
        SettlementEngine::ensure_unsettled(&order)?;

        let transaction = self.provider.verify_transaction(raw_reference).await?;
        if transaction.reference != raw_reference {
            return Err(SettlementError::ReplayOrMismatch { order_id });
        }

        let _guard = self.locks.acquire(order_id).await;
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(SettlementError::OrderNotFound(order_id))?;

        self.engine.settle(&order, &transaction).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::adapters::paystack::MockPaymentProvider;
    use crate::domain::order::{Order, OrderStatus};
    use crate::domain::payment::ProviderTransaction;
    use crate::ports::PaymentError;
    use rust_decimal_macros::dec;

    const REF: &str = "42_1700000000";

    fn order_id() -> OrderId {
        OrderId::new(42).unwrap()
    }

    struct Fixture {
        store: Arc<InMemoryOrderStore>,
        provider: MockPaymentProvider,
        handler: VerifyRedirectHandler,
    }

    async fn fixture(status: OrderStatus) -> Fixture {
        let store = Arc::new(
            InMemoryOrderStore::with_orders([
                Order::pending(order_id(), dec!(5000.00), "NGN").with_status(status)
            ])
            .await,
        );
        let provider = MockPaymentProvider::new();
        let handler = VerifyRedirectHandler::new(
            store.clone(),
            Arc::new(provider.clone()),
            Arc::new(OrderLocks::new()),
        );
        Fixture {
            store,
            provider,
            handler,
        }
    }

    fn cmd(reference: &str) -> VerifyRedirectCommand {
        VerifyRedirectCommand {
            reference: Some(reference.to_string()),
        }
    }

    #[tokio::test]
    async fn successful_payment_completes_order() {
        let f = fixture(OrderStatus::Pending).await;
        f.provider
            .set_transaction(ProviderTransaction::successful(REF, 500_000));

        let target = f.handler.handle(cmd(REF)).await;

        assert_eq!(target, RedirectTarget::OrderReturn(order_id()));
        let activity = f.store.activity(order_id()).await.unwrap();
        assert_eq!(activity.order.status, OrderStatus::Processing);
        assert_eq!(activity.transaction_id.as_deref(), Some(REF));
        assert_eq!(activity.cart_clears, 1);
    }

    #[tokio::test]
    async fn declined_payment_fails_order() {
        let f = fixture(OrderStatus::Pending).await;
        f.provider.set_transaction(ProviderTransaction::failed(REF, 500_000));

        let target = f.handler.handle(cmd(REF)).await;

        assert_eq!(target, RedirectTarget::OrderReturn(order_id()));
        let activity = f.store.activity(order_id()).await.unwrap();
        assert_eq!(activity.order.status, OrderStatus::Failed);
        assert_eq!(activity.payment_completions, 0);
        assert_eq!(activity.stock_reductions, 0);
    }

    #[tokio::test]
    async fn missing_or_malformed_reference_goes_to_cart() {
        let f = fixture(OrderStatus::Pending).await;

        assert_eq!(
            f.handler.handle(VerifyRedirectCommand { reference: None }).await,
            RedirectTarget::Cart
        );
        assert_eq!(f.handler.handle(cmd("")).await, RedirectTarget::Cart);
        assert_eq!(f.handler.handle(cmd("abc_123")).await, RedirectTarget::Cart);
        assert_eq!(f.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn unknown_order_goes_to_cart() {
        let f = fixture(OrderStatus::Pending).await;
        assert_eq!(f.handler.handle(cmd("77_1")).await, RedirectTarget::Cart);
        assert_eq!(f.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn settled_order_skips_provider_and_mutations() {
        let f = fixture(OrderStatus::Completed).await;
        f.provider
            .set_transaction(ProviderTransaction::successful(REF, 500_000));

        let target = f.handler.handle(cmd(REF)).await;

        assert_eq!(target, RedirectTarget::OrderReturn(order_id()));
        assert_eq!(f.provider.call_count(), 0);
        assert!(f.store.activity(order_id()).await.unwrap().is_untouched());
    }

    #[tokio::test]
    async fn transport_failure_leaves_order_untouched() {
        let f = fixture(OrderStatus::Pending).await;
        f.provider.set_error(PaymentError::timeout("verify exceeded 60s"));

        let target = f.handler.handle(cmd(REF)).await;

        assert_eq!(target, RedirectTarget::OrderReturn(order_id()));
        let activity = f.store.activity(order_id()).await.unwrap();
        assert_eq!(activity.order.status, OrderStatus::Pending);
        assert!(activity.is_untouched());
    }

    #[tokio::test]
    async fn provider_reporting_other_reference_is_rejected() {
        let f = fixture(OrderStatus::Pending).await;
        f.provider.set_transaction_for(
            REF,
            ProviderTransaction::successful("42_1600000000", 500_000),
        );

        let reference = TransactionReference::decode(REF).unwrap();
        let err = f.handler.settle(REF, &reference).await.unwrap_err();

        assert!(matches!(err, SettlementError::ReplayOrMismatch { .. }));
        assert!(f.store.activity(order_id()).await.unwrap().is_untouched());
    }

    #[tokio::test]
    async fn second_redirect_is_a_no_op() {
        let f = fixture(OrderStatus::Pending).await;
        f.provider
            .set_transaction(ProviderTransaction::successful(REF, 450_000));

        f.handler.handle(cmd(REF)).await;
        f.handler.handle(cmd(REF)).await;

        let activity = f.store.activity(order_id()).await.unwrap();
        assert_eq!(activity.order.status, OrderStatus::OnHold);
        assert_eq!(activity.stock_reductions, 1);
        assert_eq!(activity.cart_clears, 1);
        assert_eq!(f.provider.call_count(), 1);
    }
}
