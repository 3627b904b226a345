//! Ports layer for the batch ledger.
//!
//! - Inbound (driving) port: the API exposed to callers
//! - Outbound (driven) ports: clock and notification sink

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
