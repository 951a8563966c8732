//! Payment provider port for remote transaction verification.
//!
//! Defines the contract for asking the payment gateway (e.g., Paystack)
//! what actually happened to a transaction. Only the redirect path uses it:
//! the browser's query string is never trusted on its own.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any provider that can look
//!   a transaction up by reference
//! - **Declines are data**: A provider-reported failure is a successful call
//!   returning a `Failed` transaction, never an error

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::payment::{ProviderTransaction, SettlementError};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Fetch the authoritative record for `reference`.
    ///
    /// # Errors
    ///
    /// - `NetworkError` / `Timeout` - the provider could not be reached
    /// - `ProviderError` - the provider answered with a non-2xx status
    /// - `InvalidResponse` - the body is not a transaction record
    async fn verify_transaction(&self, reference: &str)
        -> Result<ProviderTransaction, PaymentError>;
}

/// Payment provider error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// HTTP status the provider answered with (if any).
    pub http_status: Option<u16>,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    /// Create a provider error for a non-2xx answer.
    pub fn provider(status: u16, message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message).with_http_status(status)
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for SettlementError {
    fn from(err: PaymentError) -> Self {
        match err.code {
            PaymentErrorCode::InvalidResponse => SettlementError::ResponseParse(err.message),
            _ => SettlementError::Transport(err.to_string()),
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Request exceeded the configured timeout.
    Timeout,

    /// Provider answered with a non-success HTTP status.
    ProviderError,

    /// Response body could not be understood.
    InvalidResponse,
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::Timeout => "timeout",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::InvalidResponse => "invalid_response",
        };
        write!(f, "{}", s)
    }
}
