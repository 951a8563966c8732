//! Request and response DTOs for settlement endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::settlement::CheckoutParams;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query string of the redirect-back.
///
/// The storefront's own callback uses `paystack_txnref`; Paystack itself
/// appends `reference` and `trxref`.
#[derive(Debug, Clone, Default)]
pub struct VerifyQuery {
    pub paystack_txnref: Option<String>,
    pub reference: Option<String>,
    pub trxref: Option<String>,
}

impl VerifyQuery {
    /// Builds the query from raw pairs. A repeated parameter keeps its
    /// first value; unknown parameters are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "paystack_txnref" => &mut query.paystack_txnref,
                "reference" => &mut query.reference,
                "trxref" => &mut query.trxref,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }

    /// First non-empty reference, in order of preference.
    pub fn reference(&self) -> Option<String> {
        [&self.paystack_txnref, &self.reference, &self.trxref]
            .into_iter()
            .flatten()
            .map(|r| r.trim())
            .find(|r| !r.is_empty())
            .map(str::to_string)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Inline checkout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Public key for the checkout widget.
    pub key: String,
    pub email: String,
    /// Minor units.
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

impl From<CheckoutParams> for CheckoutResponse {
    fn from(params: CheckoutParams) -> Self {
        Self {
            key: params.public_key,
            email: params.email,
            amount: params.amount,
            currency: params.currency,
            reference: params.reference,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
