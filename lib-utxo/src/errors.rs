//! UTXO Errors

use lib_data::DataError;
use thiserror::Error;

use crate::types::OutputReference;

/// Error while assembling a transaction context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtxoError {
    #[error("Duplicate input: {0:?}")]
    DuplicateInput(OutputReference),

    #[error("Empty inputs")]
    EmptyInputs,

    #[error("Datum encoding failed: {0}")]
    Datum(#[from] DataError),
}

/// Result type for UTXO operations
pub type UtxoResult<T> = Result<T, UtxoError>;
