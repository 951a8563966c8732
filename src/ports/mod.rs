//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `OrderStore` - Orders, carts, stock and notices owned by the storefront
//! - `PaymentProvider` - Remote transaction lookup at the payment gateway

mod order_store;
mod payment_provider;

pub use order_store::{NoticeKind, OrderStore};
pub use payment_provider::{PaymentError, PaymentErrorCode, PaymentProvider};
