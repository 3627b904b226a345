//! # Shared Types Crate
//!
//! This crate contains the primitives every Halal-Chain crate agrees on, plus
//! the `AuthenticatedRequest<T>` envelope that carries a caller identity into
//! the ledger.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Opaque Identity**: A `Principal` is compared, hashed and printed, never
//!   interpreted. Resolving a request to a principal happens outside the core.
//! - **No Redundant Identity**: Payloads MUST NOT contain caller fields; the
//!   envelope's `caller` is authoritative.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::AuthenticatedRequest;
pub use errors::*;
