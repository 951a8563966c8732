//! Settlement handlers.
//!
//! Command handlers for reconciling provider transactions with orders:
//!
//! ## Commands
//! - Beginning a payment attempt (issues the pending reference)
//! - Settling from the customer redirect-back
//! - Settling from a signed provider webhook
//!
//! Both settling paths share `SettlementEngine` and serialize on `OrderLocks`.

mod begin_payment;
mod handle_charge_webhook;
mod order_locks;
mod settle_order;
mod verify_redirect;

pub use begin_payment::{BeginPaymentCommand, BeginPaymentHandler, CheckoutParams};
pub use handle_charge_webhook::{HandleChargeWebhookCommand, HandleChargeWebhookHandler};
pub use order_locks::{OrderLockGuard, OrderLocks};
pub use settle_order::{SettlementEngine, SettlementOutcome};
pub use verify_redirect::{RedirectTarget, VerifyRedirectCommand, VerifyRedirectHandler};
