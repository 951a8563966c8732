//! Payment settlement domain.
//!
//! Everything needed to turn an untrusted provider signal into a settlement
//! decision: reference codec, webhook authenticity, transaction model and
//! reconciliation policy.

mod errors;
pub mod reconciliation;
pub mod reference;
mod transaction;
mod webhook_event;
pub mod webhook_verifier;

pub use errors::SettlementError;
pub use reconciliation::{reconcile, SettlementDecision};
pub use reference::TransactionReference;
pub use transaction::{ProviderTransaction, TransactionStatus};
pub use webhook_event::{ChargeData, WebhookEvent, WebhookEventType, CHARGE_SUCCESS};
pub use webhook_verifier::SignatureVerifier;
