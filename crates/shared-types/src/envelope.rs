//! # `AuthenticatedRequest` Envelope
//!
//! The wrapper for every operation submitted to the ledger.
//!
//! ## Properties
//!
//! - **Versioning**: All requests include a `version` field for forward compatibility.
//! - **Correlation**: `request_id` ties a submission to its logged outcome.
//! - **Envelope Authority**: `caller` is the sole source of truth for identity.
//!   It is resolved by the authentication layer before the request is built.

use crate::entities::Principal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An operation payload together with the principal that submitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedRequest<T> {
    /// Protocol version for forward compatibility.
    /// MUST be checked before the payload is interpreted.
    #[serde(default = "current_version")]
    pub version: u16,

    /// The authenticated caller. Payloads MUST NOT duplicate this.
    pub caller: Principal,

    /// Unique identifier for correlating the request with its outcome.
    #[serde(default = "Uuid::new_v4")]
    pub request_id: Uuid,

    /// The operation itself.
    pub payload: T,
}

fn current_version() -> u16 {
    AuthenticatedRequest::<()>::CURRENT_VERSION
}

impl<T> AuthenticatedRequest<T> {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Wraps `payload` for `caller` with a fresh request id.
    pub fn new(caller: Principal, payload: T) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            caller,
            request_id: Uuid::new_v4(),
            payload,
        }
    }

    /// True if this request speaks the current protocol version.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}
