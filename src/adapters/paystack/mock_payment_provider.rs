//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured transactions by reference
//! - Error injection
//! - Call tracking
//! - Artificial latency, to widen race windows in concurrency tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::payment::ProviderTransaction;
use crate::ports::{PaymentError, PaymentProvider};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure responses
/// mock.set_transaction(ProviderTransaction::successful("42_1700000000", 500_000));
///
/// // Inject errors
/// mock.set_error(PaymentError::timeout("slow provider"));
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Pre-configured transactions by reference.
    transactions: HashMap<String, ProviderTransaction>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Error returned on every call until cleared.
    sticky_error: Option<PaymentError>,

    /// Delay before answering.
    latency: Option<Duration>,

    /// References passed to `verify_transaction`, in call order.
    call_log: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Answer lookups of `transaction.reference` with `transaction`.
    pub fn set_transaction(&self, transaction: ProviderTransaction) {
        let reference = transaction.reference.clone();
        self.state().transactions.insert(reference, transaction);
    }

    /// Answer lookups of `reference` with `transaction`, even if the
    /// transaction reports a different reference.
    pub fn set_transaction_for(&self, reference: &str, transaction: ProviderTransaction) {
        self.state()
            .transactions
            .insert(reference.to_string(), transaction);
    }

    /// Set an error to return on the next call.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Fail every call with `error` until `clear_errors`.
    pub fn fail_always(&self, error: PaymentError) {
        self.state().sticky_error = Some(error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.sticky_error = None;
    }

    /// Delay every answer by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state().latency = Some(latency);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// References looked up so far.
    pub fn calls(&self) -> Vec<String> {
        self.state().call_log.clone()
    }

    /// Number of lookups so far.
    pub fn call_count(&self) -> usize {
        self.state().call_log.len()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<ProviderTransaction, PaymentError> {
        let latency = {
            let mut state = self.state();
            state.call_log.push(reference.to_string());
            state.latency
        };

        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state();
        if let Some(error) = state.sticky_error.clone() {
            return Err(error);
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state
            .transactions
            .get(reference)
            .cloned()
            .ok_or_else(|| PaymentError::provider(404, format!("Transaction {} not found", reference)))
    }
}
