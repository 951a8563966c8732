//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod settlement;

pub use settlement::{
    BeginPaymentCommand, BeginPaymentHandler, CheckoutParams, HandleChargeWebhookCommand,
    HandleChargeWebhookHandler, OrderLocks, RedirectTarget, SettlementEngine, SettlementOutcome,
    VerifyRedirectCommand, VerifyRedirectHandler,
};
