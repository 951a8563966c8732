//! BeginPaymentHandler - starts a payment attempt for an order.
//!
//! Issues a fresh reference, records it as the order's pending reference and
//! returns what the inline checkout widget needs. The webhook path later
//! accepts only this reference for the order.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::PaymentConfig;
use crate::domain::foundation::{OrderId, Timestamp};
use crate::domain::order::money::major_to_minor;
use crate::domain::payment::{SettlementError, TransactionReference};
use crate::ports::OrderStore;

use super::settle_order::SettlementEngine;

/// Command to begin paying for an order.
#[derive(Debug, Clone)]
pub struct BeginPaymentCommand {
    pub order_id: OrderId,
}

/// Parameters for the inline checkout widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutParams {
    pub public_key: String,
    pub email: String,
    /// Order total in minor units.
    pub amount: i64,
    pub currency: String,
    pub reference: String,
}

/// Handler for starting payment attempts.
pub struct BeginPaymentHandler {
    store: Arc<dyn OrderStore>,
    payment: PaymentConfig,
}

impl BeginPaymentHandler {
    pub fn new(store: Arc<dyn OrderStore>, payment: PaymentConfig) -> Self {
        Self { store, payment }
    }

    pub async fn handle(&self, cmd: BeginPaymentCommand) -> Result<CheckoutParams, SettlementError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    /// Same as `handle`, with the attempt time supplied.
    pub async fn handle_at(
        &self,
        cmd: BeginPaymentCommand,
        at: Timestamp,
    ) -> Result<CheckoutParams, SettlementError> {
        let public_key = match self.payment.active_public_key() {
            Some(key) if self.payment.is_available() => key.to_string(),
            _ => {
                return Err(SettlementError::GatewayUnavailable(
                    "gateway disabled, keys missing or store currency unsupported".to_string(),
                ))
            }
        };

        let order = self
            .store
            .get_order(cmd.order_id)
            .await?
            .ok_or(SettlementError::OrderNotFound(cmd.order_id))?;
        SettlementEngine::ensure_unsettled(&order)?;

        if !self.payment.supports_currency(&order.currency) {
            return Err(SettlementError::CheckoutRejected(format!(
                "currency {} is not supported",
                order.currency
            )));
        }
        let email = order
            .billing_email
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| SettlementError::CheckoutRejected("order has no billing email".to_string()))?;
        let amount = major_to_minor(order.total)
            .map_err(|e| SettlementError::CheckoutRejected(e.to_string()))?;

        let reference = TransactionReference::for_attempt(order.id, at).encode();
        self.store
            .record_pending_reference(order.id, &reference)
            .await?;

        info!(order_id = %order.id, reference = %reference, amount_minor = amount, "Payment attempt started");

        Ok(CheckoutParams {
            public_key,
            email,
            amount,
            currency: order.currency,
            reference,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryOrderStore;
    use crate::domain::order::{Order, OrderStatus};
    use rust_decimal_macros::dec;

    fn order_id() -> OrderId {
        OrderId::new(42).unwrap()
    }

    fn payment_config() -> PaymentConfig {
        PaymentConfig {
            test_secret_key: Some("sk_test_xxx".to_string()),
            test_public_key: Some("pk_test_xxx".to_string()),
            ..Default::default()
        }
    }

    fn order() -> Order {
        Order::pending(order_id(), dec!(5000.00), "NGN").with_billing_email("ada@example.com")
    }

    async fn setup(order: Order, config: PaymentConfig) -> (Arc<InMemoryOrderStore>, BeginPaymentHandler) {
        let store = Arc::new(InMemoryOrderStore::with_orders([order]).await);
        let handler = BeginPaymentHandler::new(store.clone(), config);
        (store, handler)
    }

    fn cmd() -> BeginPaymentCommand {
        BeginPaymentCommand { order_id: order_id() }
    }

    #[tokio::test]
    async fn issues_reference_and_records_it() {
        let (store, handler) = setup(order(), payment_config()).await;
        let at = Timestamp::from_unix_secs(1_700_000_000).unwrap();

        let params = handler.handle_at(cmd(), at).await.unwrap();

        assert_eq!(
            params,
            CheckoutParams {
                public_key: "pk_test_xxx".to_string(),
                email: "ada@example.com".to_string(),
                amount: 500_000,
                currency: "NGN".to_string(),
                reference: "42_1700000000".to_string(),
            }
        );
        assert_eq!(
            store.get_pending_reference(order_id()).await.unwrap().as_deref(),
            Some("42_1700000000")
        );
    }

    #[tokio::test]
    async fn new_attempt_replaces_pending_reference() {
        let (store, handler) = setup(order(), payment_config()).await;

        handler
            .handle_at(cmd(), Timestamp::from_unix_secs(1_700_000_000).unwrap())
            .await
            .unwrap();
        handler
            .handle_at(cmd(), Timestamp::from_unix_secs(1_700_000_060).unwrap())
            .await
            .unwrap();

        assert_eq!(
            store.get_pending_reference(order_id()).await.unwrap().as_deref(),
            Some("42_1700000060")
        );
    }

    #[tokio::test]
    async fn unavailable_gateway_is_rejected() {
        let disabled = PaymentConfig {
            enabled: false,
            ..payment_config()
        };
        let (store, handler) = setup(order(), disabled).await;

        let err = handler.handle(cmd()).await.unwrap_err();

        assert!(matches!(err, SettlementError::GatewayUnavailable(_)));
        assert_eq!(store.read_count().await, 0);
    }

    #[tokio::test]
    async fn settled_order_cannot_start_payment() {
        let (_store, handler) = setup(order().with_status(OrderStatus::Completed), payment_config()).await;
        assert!(matches!(
            handler.handle(cmd()).await,
            Err(SettlementError::AlreadySettled { .. })
        ));
    }

    #[tokio::test]
    async fn unsupported_currency_is_rejected() {
        let eur = Order::pending(order_id(), dec!(10), "EUR").with_billing_email("ada@example.com");
        let (_store, handler) = setup(eur, payment_config()).await;
        assert!(matches!(
            handler.handle(cmd()).await,
            Err(SettlementError::CheckoutRejected(_))
        ));
    }

    #[tokio::test]
    async fn order_without_email_is_rejected() {
        let no_email = Order::pending(order_id(), dec!(10), "NGN");
        let (_store, handler) = setup(no_email, payment_config()).await;
        assert!(matches!(
            handler.handle(cmd()).await,
            Err(SettlementError::CheckoutRejected(_))
        ));
    }

    #[tokio::test]
    async fn sub_minor_total_is_rejected() {
        let odd = Order::pending(order_id(), dec!(10.005), "NGN").with_billing_email("ada@example.com");
        let (_store, handler) = setup(odd, payment_config()).await;
        assert!(matches!(
            handler.handle(cmd()).await,
            Err(SettlementError::CheckoutRejected(_))
        ));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (_store, handler) = setup(order(), payment_config()).await;
        let err = handler
            .handle(BeginPaymentCommand {
                order_id: OrderId::new(7).unwrap(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SettlementError::OrderNotFound(_)));
    }
}
