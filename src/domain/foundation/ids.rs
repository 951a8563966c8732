//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Identifier of a store order.
///
/// Order identifiers are assigned by the external store and are always
/// positive integers. Zero is rejected so that a bare `"0"` or an empty
/// reference segment can never resolve to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct OrderId(u64);

impl OrderId {
    /// Creates an OrderId, rejecting zero.
    pub fn new(value: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::invalid_format(
                "order_id",
                "must be a positive integer",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for OrderId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderId> for u64 {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = ValidationError;

    /// Parses a strictly decimal, positive identifier.
    ///
    /// Signs, whitespace and other decorations are rejected even where
    /// `u64::from_str` would accept them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "order_id",
                format!("'{}' is not a positive integer", s),
            ));
        }
        let value: u64 = s.parse().map_err(|_| {
            ValidationError::invalid_format("order_id", format!("'{}' is out of range", s))
        })?;
        Self::new(value)
    }
}
