//! Adapters layer for the batch ledger.
//!
//! Implementations of the outbound ports: the shared-bus sink, a manual
//! clock and an in-memory recording sink.

pub mod bus;
pub mod clock;
pub mod recording;

pub use bus::BusEventSink;
pub use clock::ManualClock;
pub use recording::RecordingSink;
