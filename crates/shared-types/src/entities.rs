//! # Core Domain Entities
//!
//! Defines the primitives of the custody chain.
//!
//! ## Clusters
//!
//! - **Identity**: `Principal`, `Role`
//! - **Batches**: `BatchId`, `BatchStatus`, `Timestamp`

use crate::errors::{PrincipalParseError, UnknownRoleError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Seconds since the UNIX epoch, as stamped on history entries.
pub type Timestamp = u64;

/// An opaque, comparable identity (a 20-byte Ethereum-style address).
///
/// Rendered and parsed as `0x`-prefixed lowercase hex. A principal carries
/// no lifecycle of its own; it only exists by reference from roles and batches.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Principal([u8; 20]);

impl Principal {
    /// Number of bytes in a principal.
    pub const LEN: usize = 20;

    /// The all-zero principal. Never used as an owner sentinel; see `Batch`.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Wraps raw address bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// A principal whose every byte is `byte`. Handy for fixtures.
    #[must_use]
    pub const fn repeat(byte: u8) -> Self {
        Self([byte; 20])
    }

    /// Raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// True for the all-zero principal.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Principal({self})")
    }
}

impl FromStr for Principal {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| PrincipalParseError::InvalidHex(e.to_string()))?;
        let array: [u8; 20] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| PrincipalParseError::InvalidLength {
                    expected: Self::LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }
}

impl From<[u8; 20]> for Principal {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Principal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One of the five independent custody-chain capabilities.
///
/// Roles are granted and revoked only by the administrator. A principal may
/// hold any combination of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates batches.
    Producer,
    /// Records slaughter of a batch.
    Slaughterhouse,
    /// Issues or refuses halal certification.
    HalalAuthority,
    /// Takes custody of certified batches.
    Distributor,
    /// Takes custody from distributors and sells.
    Retailer,
}

impl Role {
    /// Every role, in custody-chain order.
    pub const ALL: [Role; 5] = [
        Role::Producer,
        Role::Slaughterhouse,
        Role::HalalAuthority,
        Role::Distributor,
        Role::Retailer,
    ];

    /// Stable textual identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Slaughterhouse => "slaughterhouse",
            Role::HalalAuthority => "halal_authority",
            Role::Distributor => "distributor",
            Role::Retailer => "retailer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    /// Case-insensitive. Also accepts the short forms `slaughter` and
    /// `authority` used by the admin console.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "producer" => Ok(Role::Producer),
            "slaughterhouse" | "slaughter" => Ok(Role::Slaughterhouse),
            "halal_authority" | "halalauthority" | "authority" => Ok(Role::HalalAuthority),
            "distributor" => Ok(Role::Distributor),
            "retailer" => Ok(Role::Retailer),
            _ => Err(UnknownRoleError(s.to_string())),
        }
    }
}

// =============================================================================
// CLUSTER B: BATCHES
// =============================================================================

/// Ledger-wide batch identifier. Assigned sequentially from 1, never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BatchId(pub u64);

impl BatchId {
    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of a batch.
///
/// ```text
/// Created ─→ PendingCertification ─┬─→ CertifiedHalal ─→ InTransit ─→ AtRetailer ─→ Sold
///                                  └─→ Rejected
/// ```
///
/// Discriminants are stable and follow the order of `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BatchStatus {
    /// Registered by its producer.
    Created = 0,
    /// Slaughter recorded, awaiting the halal authority.
    PendingCertification = 1,
    /// Certified halal, still with the producer.
    CertifiedHalal = 2,
    /// Certification refused. Terminal.
    Rejected = 3,
    /// With a distributor.
    InTransit = 4,
    /// With a retailer.
    AtRetailer = 5,
    /// Sold to a consumer. Terminal.
    Sold = 6,
}

impl BatchStatus {
    /// Every status, in discriminant order.
    pub const ALL: [BatchStatus; 7] = [
        BatchStatus::Created,
        BatchStatus::PendingCertification,
        BatchStatus::CertifiedHalal,
        BatchStatus::Rejected,
        BatchStatus::InTransit,
        BatchStatus::AtRetailer,
        BatchStatus::Sold,
    ];

    /// True for statuses that admit no further mutation.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, BatchStatus::Rejected | BatchStatus::Sold)
    }

    /// Consumer-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            BatchStatus::Created => "Batch Created",
            BatchStatus::PendingCertification => "Pending Certification",
            BatchStatus::CertifiedHalal => "Certified Halal",
            BatchStatus::Rejected => "Not Halal",
            BatchStatus::InTransit => "In Transit",
            BatchStatus::AtRetailer => "At Retailer",
            BatchStatus::Sold => "Sold",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
