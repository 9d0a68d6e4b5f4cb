//! Canonical Primitive Types for the Carbon Protocol Validators
//!
//! Rule: No String identifiers in validator state. Ever.
//!
//! These types are the foundational building blocks for every datum,
//! redeemer and transaction-context structure. They are designed to be:
//! - Fixed-size where the ledger fixes the size
//! - Deterministically serializable
//! - Cheap to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Smallest ledger currency unit
pub type Lovelace = u64;

/// Signed asset quantity (mint maps carry negative entries for burns)
pub type Quantity = i128;

/// Length of key hashes and script hashes (blake2b-224 on the host ledger)
pub const HASH28_LEN: usize = 28;

/// Length of transaction ids and datum hashes
pub const HASH32_LEN: usize = 32;

/// Ledger limit on asset name length
pub const MAX_ASSET_NAME_LEN: usize = 32;

// ============================================================================
// HASH TYPES
// ============================================================================

/// 32-byte transaction id
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct TxHash(pub [u8; HASH32_LEN]);

impl TxHash {
    /// Create a new TxHash from raw bytes
    pub const fn new(bytes: [u8; HASH32_LEN]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed TxHash
    pub const fn zero() -> Self {
        Self([0u8; HASH32_LEN])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }

    /// Check if this is the zero hash
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH32_LEN]
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH32_LEN]> for TxHash {
    fn from(bytes: [u8; HASH32_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for TxHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 32-byte hash of a datum's canonical encoding
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct DatumHash(pub [u8; HASH32_LEN]);

impl DatumHash {
    /// Create a new DatumHash from raw bytes
    pub const fn new(bytes: [u8; HASH32_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; HASH32_LEN] {
        &self.0
    }
}

impl fmt::Debug for DatumHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DatumHash({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for DatumHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH32_LEN]> for DatumHash {
    fn from(bytes: [u8; HASH32_LEN]) -> Self {
        Self(bytes)
    }
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 28-byte verification key hash (a signer identity)
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct KeyHash(pub [u8; HASH28_LEN]);

impl KeyHash {
    /// Create a new KeyHash from raw bytes
    pub const fn new(bytes: [u8; HASH28_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; HASH28_LEN] {
        &self.0
    }

    /// Parse from a byte slice of exactly 28 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; HASH28_LEN]>::try_from(bytes).ok().map(Self)
    }
}

impl fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyHash({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for KeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH28_LEN]> for KeyHash {
    fn from(bytes: [u8; HASH28_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for KeyHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// 28-byte script hash. A minting policy is identified by its script hash.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct ScriptHash(pub [u8; HASH28_LEN]);

/// Minting policy identifier
pub type PolicyId = ScriptHash;

impl ScriptHash {
    /// Create a new ScriptHash from raw bytes
    pub const fn new(bytes: [u8; HASH28_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; HASH28_LEN] {
        &self.0
    }

    /// Parse from a byte slice of exactly 28 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        <[u8; HASH28_LEN]>::try_from(bytes).ok().map(Self)
    }
}

impl fmt::Debug for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScriptHash({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for ScriptHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; HASH28_LEN]> for ScriptHash {
    fn from(bytes: [u8; HASH28_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ScriptHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Asset name: at most [`MAX_ASSET_NAME_LEN`] raw bytes under a policy
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct AssetName(Vec<u8>);

impl AssetName {
    /// Create an asset name, failing if it exceeds the ledger limit
    pub fn new(bytes: impl Into<Vec<u8>>) -> Option<Self> {
        let bytes = bytes.into();
        if bytes.len() > MAX_ASSET_NAME_LEN {
            return None;
        }
        Some(Self(bytes))
    }

    /// Concatenate a literal prefix and a suffix into one name
    pub fn with_prefix(prefix: &[u8], suffix: &[u8]) -> Option<Self> {
        let mut bytes = Vec::with_capacity(prefix.len() + suffix.len());
        bytes.extend_from_slice(prefix);
        bytes.extend_from_slice(suffix);
        Self::new(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AssetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetName({})", self)
    }
}

impl fmt::Display for AssetName {
    /// Printable ASCII prefix, hex for the remainder
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let printable = self
            .0
            .iter()
            .take_while(|b| b.is_ascii_graphic())
            .count();
        let (text, rest) = self.0.split_at(printable);
        write!(f, "{}", String::from_utf8_lossy(text))?;
        write!(f, "{}", hex::encode(rest))
    }
}

impl TryFrom<Vec<u8>> for AssetName {
    type Error = String;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        let len = bytes.len();
        Self::new(bytes).ok_or_else(|| {
            format!("asset name is {} bytes, limit is {}", len, MAX_ASSET_NAME_LEN)
        })
    }
}

impl From<AssetName> for Vec<u8> {
    fn from(name: AssetName) -> Self {
        name.0
    }
}

impl AsRef<[u8]> for AssetName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
