//! Structured Data Tree
//!
//! The self-describing value carried by datums and redeemers: records and
//! tagged unions are a constructor index plus an ordered field list,
//! primitives are integers and byte strings.

use serde::{Deserialize, Serialize};

use crate::errors::{DataError, DataResult};

/// A node of the structured data tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Data {
    /// Constructor application: tag plus ordered fields
    Constr { tag: u64, fields: Vec<Data> },
    /// Association list, order preserved
    Map(Vec<(Data, Data)>),
    List(Vec<Data>),
    Int(i128),
    Bytes(Vec<u8>),
}

/// Encode a typed value into a data tree
pub trait ToData {
    fn to_data(&self) -> Data;
}

/// Strictly decode a typed value from a data tree
pub trait FromData: Sized {
    fn from_data(data: &Data) -> DataResult<Self>;
}

impl Data {
    pub fn constr(tag: u64, fields: Vec<Data>) -> Self {
        Data::Constr { tag, fields }
    }

    pub fn bytes(bytes: impl AsRef<[u8]>) -> Self {
        Data::Bytes(bytes.as_ref().to_vec())
    }

    /// Short name of the variant, used in shape errors
    pub fn shape(&self) -> &'static str {
        match self {
            Data::Constr { .. } => "constr",
            Data::Map(_) => "map",
            Data::List(_) => "list",
            Data::Int(_) => "int",
            Data::Bytes(_) => "bytes",
        }
    }

    pub fn as_constr(&self) -> DataResult<(u64, &[Data])> {
        match self {
            Data::Constr { tag, fields } => Ok((*tag, fields)),
            other => Err(unexpected("constr", other)),
        }
    }

    /// Require constructor `tag` with exactly `arity` fields
    pub fn expect_constr(&self, tag: u64, arity: usize) -> DataResult<&[Data]> {
        let (found_tag, fields) = self.as_constr()?;
        if found_tag != tag {
            return Err(DataError::UnexpectedShape {
                expected: "matching constructor tag",
                found: "other constructor tag",
            });
        }
        if fields.len() != arity {
            return Err(DataError::WrongArity {
                tag,
                expected: arity,
                found: fields.len(),
            });
        }
        Ok(fields)
    }

    pub fn as_int(&self) -> DataResult<i128> {
        match self {
            Data::Int(value) => Ok(*value),
            other => Err(unexpected("int", other)),
        }
    }

    pub fn as_bytes(&self) -> DataResult<&[u8]> {
        match self {
            Data::Bytes(bytes) => Ok(bytes),
            other => Err(unexpected("bytes", other)),
        }
    }

    pub fn as_list(&self) -> DataResult<&[Data]> {
        match self {
            Data::List(items) => Ok(items),
            other => Err(unexpected("list", other)),
        }
    }

    pub fn as_map(&self) -> DataResult<&[(Data, Data)]> {
        match self {
            Data::Map(entries) => Ok(entries),
            other => Err(unexpected("map", other)),
        }
    }
}

fn unexpected(expected: &'static str, found: &Data) -> DataError {
    DataError::UnexpectedShape {
        expected,
        found: found.shape(),
    }
}

impl ToData for Data {
    fn to_data(&self) -> Data {
        self.clone()
    }
}

impl FromData for Data {
    fn from_data(data: &Data) -> DataResult<Self> {
        Ok(data.clone())
    }
}
