//! Protocol Configuration
//!
//! Immutable values injected into validators at construction time.
//! Nothing here is read from ambient global state.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::primitives::MAX_ASSET_NAME_LEN;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default upper bound for the protocol fee (smallest ledger unit)
pub const DEFAULT_MAX_FEE: u64 = 10_000_000;

/// Default prefix of the protocol-bound token
pub const DEFAULT_PROTOCOL_PREFIX: &str = "PROTO_";

/// Default prefix of the user-bound token
pub const DEFAULT_USER_PREFIX: &str = "USER_";

/// Shortest derived suffix accepted by [`ProtocolConfig::validate`]
pub const MIN_SUFFIX_LEN: usize = 16;

// =============================================================================
// ERRORS
// =============================================================================

/// Error while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

// =============================================================================
// PROTOCOL CONFIG
// =============================================================================

/// Parameters shared by the minting policy and the protocol validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Inclusive upper bound of `ProtocolDatum::fee`
    pub max_fee: u64,
    /// Literal prefix of the protocol-bound token name
    pub protocol_prefix: String,
    /// Literal prefix of the user-bound token name
    pub user_prefix: String,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_fee: DEFAULT_MAX_FEE,
            protocol_prefix: DEFAULT_PROTOCOL_PREFIX.to_string(),
            user_prefix: DEFAULT_USER_PREFIX.to_string(),
        }
    }
}

impl ProtocolConfig {
    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ProtocolConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check that both paired names fit the ledger limit and parse unambiguously
    pub fn validate(&self) -> Result<(), ConfigError> {
        let proto = self.protocol_prefix.as_bytes();
        let user = self.user_prefix.as_bytes();

        if proto.is_empty() || user.is_empty() {
            return Err(ConfigError::Invalid("token prefixes must be non-empty".into()));
        }
        if proto.starts_with(user) || user.starts_with(proto) {
            return Err(ConfigError::Invalid(format!(
                "prefixes {:?} and {:?} overlap",
                self.protocol_prefix, self.user_prefix
            )));
        }
        let longest = proto.len().max(user.len());
        if longest + MIN_SUFFIX_LEN > MAX_ASSET_NAME_LEN {
            return Err(ConfigError::Invalid(format!(
                "prefix of {} bytes leaves less than {} bytes of suffix",
                longest, MIN_SUFFIX_LEN
            )));
        }
        Ok(())
    }

    /// Suffix length such that both prefixed names fit in one asset name
    pub fn suffix_len(&self) -> usize {
        let longest = self.protocol_prefix.len().max(self.user_prefix.len());
        MAX_ASSET_NAME_LEN.saturating_sub(longest)
    }

    pub fn protocol_prefix_bytes(&self) -> &[u8] {
        self.protocol_prefix.as_bytes()
    }

    pub fn user_prefix_bytes(&self) -> &[u8] {
        self.user_prefix.as_bytes()
    }

    /// Whether `fee` lies in `[0, max_fee]`
    pub fn fee_in_range(&self, fee: i128) -> bool {
        (0..=self.max_fee as i128).contains(&fee)
    }
}
