//! Paystack webhook event types.
//!
//! Only fields relevant to settlement are captured. The envelope is parsed
//! first with an opaque `data` object; the charge payload is decoded only
//! once the event type says it is a charge.

use serde::{Deserialize, Serialize};

use super::{ProviderTransaction, SettlementError, TransactionStatus};

/// Event name of a successful charge.
pub const CHARGE_SUCCESS: &str = "charge.success";

/// Paystack webhook envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookEvent {
    /// Event name (e.g. "charge.success").
    pub event: String,

    /// Event-specific payload; shape depends on `event`.
    pub data: serde_json::Value,
}

/// Payload of a charge event.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChargeData {
    pub reference: String,
    /// Minor units.
    pub amount: i64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway_response: Option<String>,
}

/// Event types this service distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventType {
    ChargeSuccess,
    Other(String),
}

impl WebhookEvent {
    /// Parses the raw (already authenticated) request body.
    pub fn parse(raw_body: &[u8]) -> Result<Self, SettlementError> {
        serde_json::from_slice(raw_body).map_err(|e| SettlementError::response_parse(e.to_string()))
    }

    pub fn parsed_type(&self) -> WebhookEventType {
        if self.event == CHARGE_SUCCESS {
            WebhookEventType::ChargeSuccess
        } else {
            WebhookEventType::Other(self.event.clone())
        }
    }

    /// Decodes the charge payload and converts it into a transaction record.
    ///
    /// The status is `Success` by construction: this is only called for
    /// `charge.success` events.
    pub fn charge_transaction(&self) -> Result<ProviderTransaction, SettlementError> {
        if self.parsed_type() != WebhookEventType::ChargeSuccess {
            return Err(SettlementError::IgnoredEvent(self.event.clone()));
        }

        let charge: ChargeData = serde_json::from_value(self.data.clone())
            .map_err(|e| SettlementError::response_parse(format!("Invalid charge: {}", e)))?;

        Ok(ProviderTransaction {
            reference: charge.reference,
            status: TransactionStatus::Success,
            amount_minor: charge.amount,
            gateway_response: charge.gateway_response,
        })
    }
}
