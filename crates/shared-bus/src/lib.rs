//! # Shared Bus - Ledger Notification Bus
//!
//! Carries the notifications the ledger emits on every committed mutation to
//! whoever is watching: dashboards, indexers, audit trails.
//!
//! ## Delivery Rules
//!
//! - The ledger is the only publisher. Observers never write back through the bus.
//! - Events are published in commit order. A slow subscriber that falls more
//!   than the channel capacity behind skips the oldest events and is told so
//!   through a `debug!` record.
//! - Publishing never blocks and never fails; with no subscribers the event is dropped.
//!
//! ```text
//! ┌──────────────────┐   publish()   ┌──────────────┐   subscribe()   ┌──────────┐
//! │ TransitionEngine │ ────────────→ │  Event Bus   │ ──────────────→ │ Observer │
//! └──────────────────┘               └──────────────┘                 └──────────┘
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are skipped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
