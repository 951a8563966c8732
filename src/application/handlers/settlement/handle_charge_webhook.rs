//! HandleChargeWebhookHandler - Command handler for Paystack webhooks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::payment::{
    SettlementError, SignatureVerifier, TransactionReference, WebhookEvent,
};
use crate::ports::OrderStore;

use super::order_locks::OrderLocks;
use super::settle_order::{SettlementEngine, SettlementOutcome};

/// Command to handle a webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleChargeWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Signature header, if present.
    pub signature: Option<String>,
}

/// Handler for provider webhooks.
///
/// Only `charge.success` events settle orders. The signed reference must
/// match the reference recorded when the payment attempt began.
pub struct HandleChargeWebhookHandler {
    store: Arc<dyn OrderStore>,
    verifier: SignatureVerifier,
    locks: Arc<OrderLocks>,
    engine: SettlementEngine,
}

impl HandleChargeWebhookHandler {
    pub fn new(
        store: Arc<dyn OrderStore>,
        verifier: SignatureVerifier,
        locks: Arc<OrderLocks>,
    ) -> Self {
        Self {
            engine: SettlementEngine::new(store.clone()),
            store,
            verifier,
            locks,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleChargeWebhookCommand,
    ) -> Result<SettlementOutcome, SettlementError> {
        let result = self.process(&cmd).await;
        match &result {
            Ok(outcome) => info!(?outcome, "Webhook settled order"),
            Err(e) if e.is_benign() => debug!(reason = %e, "Webhook acknowledged without action"),
            Err(e) => warn!(reason = %e, "Webhook rejected"),
        }
        result
    }

    async fn process(
        &self,
        cmd: &HandleChargeWebhookCommand,
    ) -> Result<SettlementOutcome, SettlementError> {
        // 1. Authenticate the raw bytes before looking at them
        if !self.verifier.verify(&cmd.payload, cmd.signature.as_deref()) {
            return Err(SettlementError::AuthenticityFailure);
        }

        // 2. Parse and filter
        let event = WebhookEvent::parse(&cmd.payload)?;
        let transaction = event.charge_transaction()?;
        let reference = TransactionReference::decode(&transaction.reference)?;
        let order_id = reference.order_id();

        // 3. Serialize with the redirect path for this order
        let _guard = self.locks.acquire(order_id).await;

        // 4. Signed reference must be the one issued for this order
        let pending = self.store.get_pending_reference(order_id).await?;
        if pending.as_deref() != Some(transaction.reference.as_str()) {
            return Err(SettlementError::ReplayOrMismatch { order_id });
        }

        // 5. Guard and apply
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(SettlementError::OrderNotFound(order_id))?;

        self.engine.settle(&order, &transaction).await
    }
}
