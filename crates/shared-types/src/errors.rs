//! # Error Types
//!
//! Parse errors for the textual forms of shared primitives.

use thiserror::Error;

/// A principal could not be parsed from its hex form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalParseError {
    /// The input is not valid hexadecimal.
    #[error("invalid principal hex: {0}")]
    InvalidHex(String),

    /// The decoded input has the wrong number of bytes.
    #[error("invalid principal length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// A role identifier did not name one of the five custody-chain roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role identifier: {0:?}")]
pub struct UnknownRoleError(pub String);
