//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum routes for the redirect, webhook and checkout endpoints
//! - `memory` - In-memory order store
//! - `paystack` - Paystack verify client and a scriptable mock

pub mod http;
pub mod memory;
pub mod paystack;

pub use http::{build_app, SettlementAppState};
pub use memory::InMemoryOrderStore;
pub use paystack::{MockPaymentProvider, PaystackClient, PaystackConfig};
