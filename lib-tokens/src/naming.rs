//! Paired Token Names
//!
//! Every mint creates `<protocol_prefix><suffix>` and `<user_prefix><suffix>`
//! with one shared suffix derived from the seed input.
//!
//! # Collision model
//!
//! The suffix is the blake3 digest of the seed reference, truncated to fit
//! the ledger's asset-name limit. Uniqueness across mints rests on two
//! things outside this module: the ledger consumes each output reference
//! at most once, and truncated blake3 is collision resistant. Nothing here
//! remembers previously issued suffixes.

use lib_types::{AssetName, ProtocolConfig};
use lib_utxo::OutputReference;

/// Derive the shared name suffix from a seed reference.
///
/// `blake3(tx_id || index_be)` truncated to `len` bytes (at most 32).
pub fn derive_suffix(seed: &OutputReference, len: usize) -> Vec<u8> {
    let digest = blake3::hash(&seed.to_bytes());
    digest.as_bytes()[..len.min(blake3::OUT_LEN)].to_vec()
}

/// Which half of a pair a token name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenRole {
    /// Travels with the protocol UTXO
    Protocol,
    /// Handed to the user
    User,
}

/// The two names produced by one mint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedNames {
    pub protocol: AssetName,
    pub user: AssetName,
    pub suffix: Vec<u8>,
}

impl PairedNames {
    /// Names for an explicit suffix; `None` if a name would exceed the limit
    pub fn for_suffix(config: &ProtocolConfig, suffix: &[u8]) -> Option<Self> {
        Some(Self {
            protocol: AssetName::with_prefix(config.protocol_prefix_bytes(), suffix)?,
            user: AssetName::with_prefix(config.user_prefix_bytes(), suffix)?,
            suffix: suffix.to_vec(),
        })
    }

    /// Names a mint seeded by `seed` must produce
    pub fn derive(config: &ProtocolConfig, seed: &OutputReference) -> Option<Self> {
        Self::for_suffix(config, &derive_suffix(seed, config.suffix_len()))
    }

    pub fn name(&self, role: TokenRole) -> &AssetName {
        match role {
            TokenRole::Protocol => &self.protocol,
            TokenRole::User => &self.user,
        }
    }
}

/// Split a name into its role and suffix by literal prefix
pub fn classify<'a>(config: &ProtocolConfig, name: &'a AssetName) -> Option<(TokenRole, &'a [u8])> {
    let bytes = name.as_bytes();
    if let Some(suffix) = bytes.strip_prefix(config.protocol_prefix_bytes()) {
        return Some((TokenRole::Protocol, suffix));
    }
    if let Some(suffix) = bytes.strip_prefix(config.user_prefix_bytes()) {
        return Some((TokenRole::User, suffix));
    }
    None
}
