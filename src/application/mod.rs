//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    BeginPaymentCommand, BeginPaymentHandler, CheckoutParams, HandleChargeWebhookCommand,
    HandleChargeWebhookHandler, OrderLocks, RedirectTarget, SettlementEngine, SettlementOutcome,
    VerifyRedirectCommand, VerifyRedirectHandler,
};
