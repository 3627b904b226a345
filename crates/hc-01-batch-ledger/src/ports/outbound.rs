//! # Outbound Ports
//!
//! What the ledger needs from its host: a clock for history timestamps and a
//! sink for notifications.

use shared_bus::LedgerEvent;
use shared_types::Timestamp;

/// Time source abstraction for testability.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in seconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

/// Receives one notification per successful state change.
///
/// Called while the ledger still holds its commit lock, so implementations
/// must not block and must not call back into the ledger.
pub trait LedgerEventSink: Send + Sync {
    fn emit(&self, event: LedgerEvent);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

impl LedgerEventSink for NoOpSink {
    fn emit(&self, _event: LedgerEvent) {}
}
