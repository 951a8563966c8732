//! HTTP adapters - REST API implementations.

pub mod settlement;

// Re-export key types for convenience
pub use settlement::{build_app, settlement_router, SettlementAppState};
