//! Order domain module.
//!
//! # Module Structure
//!
//! - `order` - Order snapshot loaded from the store
//! - `status` - OrderStatus lifecycle and the settled-status guard
//! - `money` - Exact minor/major unit conversion

pub mod money;
mod order;
mod status;

pub use order::Order;
pub use status::OrderStatus;
