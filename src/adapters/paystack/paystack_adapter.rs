//! Paystack payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Paystack REST API.
//!
//! # Security
//!
//! - The secret key travels only in the `Authorization` header
//! - Secrets handled via `secrecy::SecretString` and never logged
//! - The reference is percent-encoded as a single path segment
//!
//! # Configuration
//!
//! ```ignore
//! let config = PaystackConfig::new(secret_key).with_timeout(Duration::from_secs(60));
//! let client = PaystackClient::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::config::PaymentConfig;
use crate::domain::payment::ProviderTransaction;
use crate::ports::{PaymentError, PaymentProvider};

use super::wire_types::VerifyResponse;

const DEFAULT_BASE_URL: &str = "https://api.paystack.co";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Paystack API configuration.
#[derive(Clone)]
pub struct PaystackConfig {
    /// Secret key of the active mode (sk_live_... or sk_test_...).
    secret_key: SecretString,

    /// Base URL for the Paystack API (default: https://api.paystack.co).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl PaystackConfig {
    /// Create a new Paystack configuration.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretString::new(secret_key.into()),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from application payment settings, using the active key.
    ///
    /// Returns `None` when the active mode has no secret key.
    pub fn from_payment_config(config: &PaymentConfig) -> Option<Self> {
        let secret = config.active_secret_key()?;
        Some(
            Self::new(secret)
                .with_base_url(config.api_base_url.clone())
                .with_timeout(Duration::from_secs(config.verify_timeout_secs)),
        )
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for PaystackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaystackConfig")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Paystack payment provider adapter.
pub struct PaystackClient {
    config: PaystackConfig,
    http_client: reqwest::Client,
}

impl PaystackClient {
    /// Create a new Paystack client with the given configuration.
    pub fn new(config: PaystackConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// `{base}/transaction/verify/{reference}` with the reference encoded as
    /// one path segment.
    fn verify_url(&self, reference: &str) -> Result<Url, PaymentError> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| PaymentError::network(format!("Invalid Paystack base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::network("Paystack base URL cannot take a path"))?
            .pop_if_empty()
            .extend(["transaction", "verify", reference]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentProvider for PaystackClient {
    async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<ProviderTransaction, PaymentError> {
        let url = self.verify_url(reference)?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::timeout(format!("Paystack verify timed out: {}", e))
                } else {
                    PaymentError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                reference = %reference,
                http_status = status.as_u16(),
                "Paystack verify returned an error status"
            );
            return Err(PaymentError::provider(
                status.as_u16(),
                format!("Paystack API error: {}", error_text),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                PaymentError::timeout(e.to_string())
            } else {
                PaymentError::network(e.to_string())
            }
        })?;

        let parsed: VerifyResponse = serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(reference = %reference, error = %e, "Failed to parse Paystack response");
            PaymentError::invalid_response(format!("Failed to parse Paystack response: {}", e))
        })?;

        let transaction = parsed.into_transaction()?;

        tracing::debug!(
            reference = %transaction.reference,
            status = ?transaction.status,
            amount_minor = transaction.amount_minor,
            "Paystack transaction verified"
        );

        Ok(transaction)
    }
}
