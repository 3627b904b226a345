//! # Node Configuration
//!
//! Unified configuration for the ledger and runtime parameters.
//!
//! ## Environment Overrides
//!
//! | Variable | Field |
//! |----------|-------|
//! | `HC_ADMIN` | `ledger.admin` |
//! | `HC_MAX_NAME_BYTES` | `ledger.limits.max_name_bytes` |
//! | `HC_BUS_CAPACITY` | `bus.capacity` |
//! | `HC_LOG_LEVEL` | `logging.level` |
//! | `HC_LOG_JSON` | `logging.json` |
//! | `HC_SCRIPT` | `script.path` |
//!
//! ## Security Requirements
//!
//! - `ledger.admin` MUST NOT be the zero principal in production

use hc_01_batch_ledger::LedgerConfig;
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::{Principal, PrincipalParseError};
use std::path::PathBuf;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Ledger configuration.
    pub ledger: LedgerSection,
    /// Notification bus configuration.
    pub bus: BusConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
    /// Command script replay.
    pub script: ScriptConfig,
}

impl NodeConfig {
    /// Defaults overridden by the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a variable is set to an unparsable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a variable is set to an unparsable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("HC_ADMIN") {
            config.ledger.admin = value
                .parse()
                .map_err(|source| ConfigError::InvalidAdmin { value, source })?;
        }
        if let Some(value) = lookup("HC_MAX_NAME_BYTES") {
            config.ledger.limits.max_name_bytes = parse_number("HC_MAX_NAME_BYTES", value)?;
        }
        if let Some(value) = lookup("HC_BUS_CAPACITY") {
            config.bus.capacity = parse_number("HC_BUS_CAPACITY", value)?;
        }
        if let Some(level) = lookup("HC_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(value) = lookup("HC_LOG_JSON") {
            config.logging.json = matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(path) = lookup("HC_SCRIPT") {
            config.script.path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Validate configuration for production readiness.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the administrator is the zero principal
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        if self.ledger.admin.is_zero() {
            return Err(ConfigError::UnsetAdmin);
        }
        Ok(())
    }
}

/// Parses a limit. Zero is refused: it would leave the node unable to work.
fn parse_number(var: &'static str, value: String) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(ConfigError::InvalidNumber { var, value }),
        Ok(number) => Ok(number),
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The administrator is not set (zero principal).
    #[error(
        "SECURITY VIOLATION: administrator is the zero principal. \
         Set HC_ADMIN environment variable or provide in config."
    )]
    UnsetAdmin,

    /// `HC_ADMIN` is not a principal.
    #[error("HC_ADMIN={value:?} is not a valid principal: {source}")]
    InvalidAdmin {
        value: String,
        #[source]
        source: PrincipalParseError,
    },

    /// A numeric variable did not parse.
    #[error("{var}={value:?} is not a valid positive number")]
    InvalidNumber { var: &'static str, value: String },
}

/// Ledger configuration.
#[derive(Debug, Clone, Default)]
pub struct LedgerSection {
    /// The singleton administrator, fixed for the ledger's lifetime.
    /// MUST be overridden in production.
    pub admin: Principal,
    /// Input limits.
    pub limits: LedgerConfig,
}

/// Notification bus configuration.
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Broadcast channel capacity. Slow observers lag past this.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Command script configuration.
#[derive(Debug, Clone, Default)]
pub struct ScriptConfig {
    /// JSON array of requests to replay at startup.
    pub path: Option<PathBuf>,
}
