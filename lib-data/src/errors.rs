//! Data Errors

use lib_types::ValidationError;
use thiserror::Error;

/// Error while encoding, decoding or interpreting structured data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("CBOR decoding failed: {0}")]
    Decode(String),

    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    #[error("{0} trailing bytes after data item")]
    TrailingBytes(usize),

    #[error("Unsupported CBOR item: {0}")]
    Unsupported(&'static str),

    #[error("Unknown CBOR tag: {0}")]
    UnknownTag(u64),

    #[error("Integer out of range")]
    IntegerOutOfRange,

    #[error("Non-canonical encoding: {0}")]
    NonCanonical(&'static str),

    #[error("Nesting deeper than {0} levels")]
    TooDeep(usize),

    #[error("Expected {expected}, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unknown constructor {tag} for {type_name}")]
    UnknownConstructor { type_name: &'static str, tag: u64 },

    #[error("Constructor {tag} expects {expected} fields, found {found}")]
    WrongArity {
        tag: u64,
        expected: usize,
        found: usize,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Result type for data operations
pub type DataResult<T> = Result<T, DataError>;

impl From<DataError> for ValidationError {
    fn from(err: DataError) -> Self {
        ValidationError::MalformedData(err.to_string())
    }
}
