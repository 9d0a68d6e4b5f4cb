//! Validation Errors
//!
//! Every rejection a validator can produce. There is no warn-and-continue
//! outcome: any variant rejects the whole transaction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::primitives::{AssetName, Quantity};

/// Coarse classification of a rejection, surfaced to transaction authors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Wrong transaction shape, unknown redeemer, malformed datum
    Structural,
    /// Required key set not intersected by the signatories
    Authorization,
    /// An immutable datum field changed across a spend
    ImmutabilityViolation,
    /// A mutable field left its permitted bound
    Range,
    /// A minted name does not match the name derived from the seed
    Uniqueness,
    /// A token burned without its pair, or in the wrong quantity
    BurnMismatch,
}

/// Error produced by a validator invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    // =========================================================================
    // Structural
    // =========================================================================
    #[error("Malformed data: {0}")]
    MalformedData(String),

    #[error("Script invoked for the wrong purpose: {0}")]
    WrongPurpose(String),

    #[error("Spent input not found in transaction inputs")]
    OwnInputMissing,

    #[error("Validated input holds {found} protocol tokens, expected exactly 1")]
    ProtocolTokenAmbiguous { found: usize },

    #[error("Expected exactly 1 input carrying the protocol token, found {found}")]
    ProtocolInputCount { found: usize },

    #[error("Expected {expected} outputs carrying the protocol token, found {found}")]
    ProtocolOutputCount { expected: usize, found: usize },

    #[error("Protocol token input is not the input being validated")]
    ProtocolInputNotOwn,

    #[error("Protocol token output is not locked by the protocol validator")]
    ProtocolOutputForeign,

    #[error("Protocol token output carries quantity {quantity}, expected 1")]
    ProtocolOutputQuantity { quantity: Quantity },

    #[error("Required datum is missing or unresolved")]
    MissingDatum,

    #[error("Lifecycle mismatch: redeemer requires {expected}, transaction leaves protocol {found}")]
    LifecycleMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Transaction has no inputs to seed the token name")]
    MissingSeedInput,

    #[error("Expected {expected} minted assets under the policy, found {found}")]
    MintCardinality { expected: usize, found: usize },

    #[error("Minted asset {asset} has quantity {quantity}, expected 1")]
    MintQuantity { asset: AssetName, quantity: Quantity },

    #[error("Asset {asset} is burned inside a mint transaction")]
    BurnDuringMint { asset: AssetName },

    #[error("Asset {asset} is minted inside a burn transaction")]
    MintDuringBurn { asset: AssetName },

    #[error("Burn transaction burns nothing under the policy")]
    NothingBurned,

    #[error("Genesis output check failed: {0}")]
    GenesisOutput(String),

    // =========================================================================
    // Authorization
    // =========================================================================
    #[error("Required key set is empty")]
    EmptyRequiredKeys,

    #[error("None of the {required} authorized keys signed the transaction")]
    MissingSignature { required: usize },

    // =========================================================================
    // Immutability
    // =========================================================================
    #[error("Immutable field `{field}` changed")]
    ImmutableFieldChanged { field: &'static str },

    // =========================================================================
    // Range
    // =========================================================================
    #[error("Fee {fee} outside permitted range [0, {max}]")]
    FeeOutOfRange { fee: i128, max: u64 },

    // =========================================================================
    // Uniqueness
    // =========================================================================
    #[error("Minted asset {found} does not match derived name {expected}")]
    NameMismatch { expected: AssetName, found: AssetName },

    // =========================================================================
    // Burn mismatch
    // =========================================================================
    #[error("Burned token with suffix {suffix} has no burned pair")]
    UnpairedBurn { suffix: String },

    #[error("Burned asset {asset} has quantity {quantity}, expected -1")]
    BurnQuantity { asset: AssetName, quantity: Quantity },

    #[error("Burned asset {asset} is not a paired token name")]
    UnknownBurnName { asset: AssetName },
}

impl ValidationError {
    /// Map a concrete rejection to its error kind
    pub fn kind(&self) -> ErrorKind {
        use ValidationError::*;
        match self {
            MalformedData(_)
            | WrongPurpose(_)
            | OwnInputMissing
            | ProtocolTokenAmbiguous { .. }
            | ProtocolInputCount { .. }
            | ProtocolOutputCount { .. }
            | ProtocolInputNotOwn
            | ProtocolOutputForeign
            | ProtocolOutputQuantity { .. }
            | MissingDatum
            | LifecycleMismatch { .. }
            | MissingSeedInput
            | MintCardinality { .. }
            | MintQuantity { .. }
            | BurnDuringMint { .. }
            | MintDuringBurn { .. }
            | NothingBurned
            | GenesisOutput(_) => ErrorKind::Structural,
            EmptyRequiredKeys | MissingSignature { .. } => ErrorKind::Authorization,
            ImmutableFieldChanged { .. } => ErrorKind::ImmutabilityViolation,
            FeeOutOfRange { .. } => ErrorKind::Range,
            NameMismatch { .. } => ErrorKind::Uniqueness,
            UnpairedBurn { .. } | BurnQuantity { .. } | UnknownBurnName { .. } => {
                ErrorKind::BurnMismatch
            }
        }
    }
}

/// Result type for validator invocations
pub type ValidationResult<T> = Result<T, ValidationError>;
