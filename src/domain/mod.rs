//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `order` - Order read model, status lifecycle and money conversion
//! - `payment` - Reference codec, webhook authenticity and reconciliation

pub mod foundation;
pub mod order;
pub mod payment;
