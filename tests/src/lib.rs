//! # Halal-Chain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks for the ledger hot paths
//! └── src/
//!     ├── fixtures.rs   # Shared actors and a fully staffed ledger
//!     └── integration/  # Cross-crate flows
//!         ├── flows.rs         # Full custody chain through the public API
//!         ├── choreography.rs  # Notifications observed through shared-bus
//!         └── concurrency.rs   # Many threads against one ledger
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p hc-tests
//!
//! # By category
//! cargo test -p hc-tests integration::flows::
//! cargo test -p hc-tests integration::choreography::
//!
//! # Benchmarks
//! cargo bench -p hc-tests
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]
