//! Paystack API response types.
//!
//! Minimal representations of Paystack objects for deserialization. Only
//! fields the settlement flow reads are included; unknown fields are ignored.

use serde::Deserialize;

use crate::domain::payment::{ProviderTransaction, TransactionStatus};
use crate::ports::PaymentError;

/// Envelope of `GET /transaction/verify/:reference`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    /// Whether the API call itself succeeded (not the payment).
    pub status: bool,

    #[serde(default)]
    pub message: String,

    pub data: Option<VerifyData>,
}

/// Transaction object inside a verify response.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyData {
    /// Payment outcome: "success", "failed", "abandoned", "reversed", ...
    pub status: String,

    pub reference: String,

    /// Amount in minor units.
    pub amount: i64,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub gateway_response: Option<String>,
}

impl VerifyResponse {
    /// Converts into the domain record.
    ///
    /// A response whose API-level `status` is false, or that carries no
    /// `data`, is not a transaction record.
    pub fn into_transaction(self) -> Result<ProviderTransaction, PaymentError> {
        if !self.status {
            return Err(PaymentError::invalid_response(format!(
                "Paystack reported failure: {}",
                self.message
            )));
        }
        let data = self
            .data
            .ok_or_else(|| PaymentError::invalid_response("Verify response has no data"))?;

        Ok(ProviderTransaction {
            reference: data.reference,
            status: TransactionStatus::from_provider(&data.status),
            amount_minor: data.amount,
            gateway_response: data.gateway_response,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PaymentErrorCode;

    #[test]
    fn parses_successful_verification() {
        let json = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "id": 4099260516,
                "status": "success",
                "reference": "42_1700000000",
                "amount": 500000,
                "currency": "NGN",
                "gateway_response": "Successful",
                "customer": {"email": "ada@example.com"}
            }
        }"#;

        let response: VerifyResponse = serde_json::from_str(json).unwrap();
        let txn = response.into_transaction().unwrap();
        assert_eq!(txn.reference, "42_1700000000");
        assert_eq!(txn.amount_minor, 500_000);
        assert!(txn.is_success());
        assert_eq!(txn.gateway_response.as_deref(), Some("Successful"));
    }

    #[test]
    fn abandoned_is_a_failed_transaction() {
        let json = r#"{"status":true,"message":"ok","data":{"status":"abandoned","reference":"42_1","amount":500000}}"#;
        let response: VerifyResponse = serde_json::from_str(json).unwrap();
        let txn = response.into_transaction().unwrap();
        assert_eq!(txn.status, TransactionStatus::Failed);
    }

    #[test]
    fn missing_data_is_invalid_response() {
        let json = r#"{"status":true,"message":"ok"}"#;
        let response: VerifyResponse = serde_json::from_str(json).unwrap();
        let err = response.into_transaction().unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::InvalidResponse);
    }

    #[test]
    fn api_failure_is_invalid_response() {
        let json = r#"{"status":false,"message":"Transaction reference not found","data":null}"#;
        let response: VerifyResponse = serde_json::from_str(json).unwrap();
        let err = response.into_transaction().unwrap_err();
        assert!(err.message.contains("Transaction reference not found"));
    }

    #[test]
    fn missing_amount_fails_to_parse() {
        let json = r#"{"status":true,"data":{"status":"success","reference":"42_1"}}"#;
        assert!(serde_json::from_str::<VerifyResponse>(json).is_err());
    }
}
