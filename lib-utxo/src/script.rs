//! Script Traits
//!
//! The seam between the host ledger and the validators. A host invokes one
//! script per script-locked input and one per minting policy; each call is
//! a pure predicate over the transaction context.

use lib_data::Data;
use lib_types::{PolicyId, ValidationResult};

use crate::types::{OutputReference, TransactionContext};

/// Validator guarding script-locked outputs
pub trait SpendingScript {
    /// Decide whether `own_ref` may be spent by `ctx`.
    ///
    /// `datum` is the spent output's datum, already resolved by the host.
    fn validate_spend(
        &self,
        ctx: &TransactionContext,
        own_ref: &OutputReference,
        datum: Option<&Data>,
        redeemer: &Data,
    ) -> ValidationResult<()>;
}

/// Policy controlling minting and burning under one policy id
pub trait MintingScript {
    fn validate_mint(
        &self,
        ctx: &TransactionContext,
        own_policy: &PolicyId,
        redeemer: &Data,
    ) -> ValidationResult<()>;
}
