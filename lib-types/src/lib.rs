//! Carbon protocol primitives.
//! Stable, ledger-neutral, behavior-free.
//!
//! Rule: No String identifiers in validator state. Ever.

pub mod config;
pub mod errors;
pub mod primitives;

pub use config::{
    ConfigError, ProtocolConfig, DEFAULT_MAX_FEE, DEFAULT_PROTOCOL_PREFIX, DEFAULT_USER_PREFIX,
    MIN_SUFFIX_LEN,
};
pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use primitives::{
    AssetName, DatumHash, KeyHash, Lovelace, PolicyId, Quantity, ScriptHash, TxHash, HASH28_LEN,
    HASH32_LEN, MAX_ASSET_NAME_LEN,
};
