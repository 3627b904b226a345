//! # Event Handlers
//!
//! Observers that consume ledger notifications from the bus.

pub mod audit;

pub use audit::*;
