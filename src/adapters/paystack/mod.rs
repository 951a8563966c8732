//! Paystack payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Paystack:
//! - Transaction verification by reference
//! - Typed wire structs for the verify response
//!
//! Webhook signatures are checked in the domain (`SignatureVerifier`), not
//! here: the webhook path never calls out to Paystack.
//!
//! # Configuration
//!
//! Uses the active secret key from `PaymentConfig` (test or live, chosen
//! by `test_mode`).

mod mock_payment_provider;
mod paystack_adapter;
mod wire_types;

pub use mock_payment_provider::MockPaymentProvider;
pub use paystack_adapter::{PaystackClient, PaystackConfig};
pub use wire_types::{VerifyData, VerifyResponse};
