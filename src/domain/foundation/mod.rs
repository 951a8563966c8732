//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps and error types used across the
//! order and payment modules.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::OrderId;
pub use timestamp::Timestamp;
