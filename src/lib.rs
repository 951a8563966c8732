//! Order Settlement - Paystack payment reconciliation
//!
//! This crate decides the fate of store orders from Paystack transaction
//! outcomes. Two independent paths reach the same settlement engine: the
//! customer's redirect-back, verified against the Paystack API, and signed
//! webhook deliveries. A per-order lock and a settled-status guard make
//! sure an order is settled exactly once whichever path arrives first.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
