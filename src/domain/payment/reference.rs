//! Transaction reference codec.
//!
//! A reference correlates a provider transaction with a store order. It is
//! serialized as `<order_id>_<nonce>`. The `_` separator is reserved for the
//! boundary between the two parts: decoding splits on the first occurrence
//! only, so a nonce may itself contain `_` and still round-trip.

use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{OrderId, Timestamp};

use super::SettlementError;

/// Separator between the order id and the nonce.
pub const REFERENCE_SEPARATOR: char = '_';

/// Decoded `<order_id>_<nonce>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionReference {
    order_id: OrderId,
    nonce: String,
}

impl TransactionReference {
    /// Builds a reference from its parts.
    ///
    /// The nonce must be non-empty so that a reference can never collapse
    /// into a bare order id.
    pub fn new(order_id: OrderId, nonce: impl Into<String>) -> Result<Self, SettlementError> {
        let nonce = nonce.into();
        if nonce.is_empty() {
            return Err(SettlementError::malformed_reference("empty nonce"));
        }
        Ok(Self { order_id, nonce })
    }

    /// Fresh reference for a payment attempt started at `at`.
    pub fn for_attempt(order_id: OrderId, at: Timestamp) -> Self {
        Self {
            order_id,
            nonce: at.as_unix_secs().to_string(),
        }
    }

    /// Parses `<order_id>_<nonce>`.
    ///
    /// # Errors
    ///
    /// `MalformedReference` if the separator is missing, the leading segment
    /// is not a positive integer, or the nonce is empty.
    pub fn decode(reference: &str) -> Result<Self, SettlementError> {
        let (order_part, nonce) = reference
            .split_once(REFERENCE_SEPARATOR)
            .ok_or_else(|| SettlementError::malformed_reference("missing separator"))?;

        let order_id: OrderId = order_part.parse().map_err(|_| {
            SettlementError::malformed_reference("order id is not a positive integer")
        })?;

        Self::new(order_id, nonce)
    }

    /// Serializes to `<order_id>_<nonce>`.
    pub fn encode(&self) -> String {
        encode(self.order_id, &self.nonce)
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}

/// Joins an order id and nonce into a reference string.
pub fn encode(order_id: OrderId, nonce: &str) -> String {
    format!("{}{}{}", order_id, REFERENCE_SEPARATOR, nonce)
}

impl fmt::Display for TransactionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.order_id, REFERENCE_SEPARATOR, self.nonce)
    }
}

impl FromStr for TransactionReference {
    type Err = SettlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
