//! The provider's claim about a transaction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::money::minor_to_major;

/// Outcome the provider reports for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl TransactionStatus {
    /// Maps a provider status string.
    ///
    /// Only `success` counts as paid. `failed`, `abandoned`, `reversed` and
    /// anything the provider adds later are all treated as not paid.
    pub fn from_provider(status: &str) -> Self {
        if status == "success" {
            TransactionStatus::Success
        } else {
            TransactionStatus::Failed
        }
    }
}

/// Typed transaction record obtained by fetch (redirect) or signed push
/// (webhook).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderTransaction {
    /// Raw reference string as the provider reported it.
    pub reference: String,
    pub status: TransactionStatus,
    /// Amount in minor units (kobo, cents).
    pub amount_minor: i64,
    /// Provider's human-readable explanation, when it sent one.
    pub gateway_response: Option<String>,
}

impl ProviderTransaction {
    pub fn new(reference: impl Into<String>, status: TransactionStatus, amount_minor: i64) -> Self {
        Self {
            reference: reference.into(),
            status,
            amount_minor,
            gateway_response: None,
        }
    }

    pub fn successful(reference: impl Into<String>, amount_minor: i64) -> Self {
        Self::new(reference, TransactionStatus::Success, amount_minor)
    }

    pub fn failed(reference: impl Into<String>, amount_minor: i64) -> Self {
        Self::new(reference, TransactionStatus::Failed, amount_minor)
    }

    pub fn is_success(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Amount paid in major units.
    pub fn amount_paid(&self) -> Decimal {
        minor_to_major(self.amount_minor)
    }
}
