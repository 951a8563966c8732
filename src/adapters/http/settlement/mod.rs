//! HTTP adapter for the Paystack settlement endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CheckoutResponse, ErrorResponse, VerifyQuery};
pub use handlers::{
    begin_checkout, handle_paystack_webhook, verify_redirect, SettlementApiError,
    SettlementAppState,
};
pub use routes::{build_app, settlement_router, settlement_routes};
