//! CBOR Wire Format for Structured Data
//!
//! # Encoding
//!
//! - **Constructors**: index `0..=6` is tag `121 + i`, `7..=127` is tag
//!   `1280 + (i - 7)`, anything larger is tag `102` wrapping `[i, fields]`
//! - **Integers**: major types 0/1, bignum tags 2/3 beyond 64 bits
//! - **Byte strings, lists, maps**: definite-length on output
//!
//! Decoding is strict: text, floats, simple values, unknown tags, nesting
//! beyond [`MAX_DEPTH`] and trailing bytes are all errors. So are tag `102`
//! over an index that has a compact tag, and bignums that are zero-padded
//! or small enough for a plain integer.

use ciborium::value::{Integer, Value};
use lib_types::DatumHash;

use crate::data::Data;
use crate::errors::{DataError, DataResult};

/// Maximum nesting depth accepted by the decoder
pub const MAX_DEPTH: usize = 64;

const TAG_BIGNUM_POS: u64 = 2;
const TAG_BIGNUM_NEG: u64 = 3;
const TAG_CONSTR_GENERAL: u64 = 102;
const TAG_CONSTR_SMALL: u64 = 121;
const TAG_CONSTR_LARGE: u64 = 1280;

impl Data {
    /// Serialize to CBOR bytes
    pub fn to_cbor(&self) -> DataResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(&to_value(self)?, &mut buf)
            .map_err(|e| DataError::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize exactly one data item from CBOR bytes
    pub fn from_cbor(bytes: &[u8]) -> DataResult<Self> {
        let mut reader = bytes;
        let value: Value = ciborium::from_reader(&mut reader)
            .map_err(|e| DataError::Decode(e.to_string()))?;
        if !reader.is_empty() {
            return Err(DataError::TrailingBytes(reader.len()));
        }
        from_value(&value, 0)
    }

    /// Hash of the canonical CBOR encoding
    pub fn hash(&self) -> DataResult<DatumHash> {
        let bytes = self.to_cbor()?;
        Ok(DatumHash::new(blake3::hash(&bytes).into()))
    }
}

fn to_value(data: &Data) -> DataResult<Value> {
    Ok(match data {
        Data::Constr { tag, fields } => {
            let fields = Value::Array(fields.iter().map(to_value).collect::<DataResult<_>>()?);
            match *tag {
                0..=6 => Value::Tag(TAG_CONSTR_SMALL + tag, Box::new(fields)),
                7..=127 => Value::Tag(TAG_CONSTR_LARGE + (tag - 7), Box::new(fields)),
                _ => Value::Tag(
                    TAG_CONSTR_GENERAL,
                    Box::new(Value::Array(vec![Value::Integer((*tag).into()), fields])),
                ),
            }
        }
        Data::Map(entries) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| Ok((to_value(k)?, to_value(v)?)))
                .collect::<DataResult<_>>()?,
        ),
        Data::List(items) => Value::Array(items.iter().map(to_value).collect::<DataResult<_>>()?),
        Data::Int(value) => int_to_value(*value),
        Data::Bytes(bytes) => Value::Bytes(bytes.clone()),
    })
}

fn int_to_value(value: i128) -> Value {
    if let Ok(small) = Integer::try_from(value) {
        return Value::Integer(small);
    }
    // Bignum: tag 2 carries n, tag 3 carries -1 - n
    let (tag, magnitude) = if value >= 0 {
        (TAG_BIGNUM_POS, value as u128)
    } else {
        (TAG_BIGNUM_NEG, (-1 - value) as u128)
    };
    let bytes = magnitude.to_be_bytes();
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    Value::Tag(tag, Box::new(Value::Bytes(bytes[first..].to_vec())))
}

fn from_value(value: &Value, depth: usize) -> DataResult<Data> {
    if depth > MAX_DEPTH {
        return Err(DataError::TooDeep(MAX_DEPTH));
    }
    match value {
        Value::Integer(int) => Ok(Data::Int(i128::from(*int))),
        Value::Bytes(bytes) => Ok(Data::Bytes(bytes.clone())),
        Value::Array(items) => Ok(Data::List(
            items
                .iter()
                .map(|item| from_value(item, depth + 1))
                .collect::<DataResult<_>>()?,
        )),
        Value::Map(entries) => Ok(Data::Map(
            entries
                .iter()
                .map(|(k, v)| Ok((from_value(k, depth + 1)?, from_value(v, depth + 1)?)))
                .collect::<DataResult<_>>()?,
        )),
        Value::Tag(tag, inner) => from_tagged(*tag, inner, depth),
        Value::Text(_) => Err(DataError::Unsupported("text string")),
        Value::Float(_) => Err(DataError::Unsupported("float")),
        Value::Bool(_) => Err(DataError::Unsupported("boolean")),
        Value::Null => Err(DataError::Unsupported("null")),
        _ => Err(DataError::Unsupported("simple value")),
    }
}

fn from_tagged(tag: u64, inner: &Value, depth: usize) -> DataResult<Data> {
    match tag {
        TAG_BIGNUM_POS | TAG_BIGNUM_NEG => {
            let magnitude = bignum_magnitude(inner)?;
            let magnitude = i128::try_from(magnitude).map_err(|_| DataError::IntegerOutOfRange)?;
            Ok(Data::Int(if tag == TAG_BIGNUM_POS {
                magnitude
            } else {
                -1 - magnitude
            }))
        }
        121..=127 => constr_fields(tag - TAG_CONSTR_SMALL, inner, depth),
        1280..=1400 => constr_fields(tag - TAG_CONSTR_LARGE + 7, inner, depth),
        TAG_CONSTR_GENERAL => {
            let Value::Array(pair) = inner else {
                return Err(DataError::UnexpectedShape {
                    expected: "[index, fields]",
                    found: "non-array",
                });
            };
            let [Value::Integer(index), fields] = pair.as_slice() else {
                return Err(DataError::UnexpectedShape {
                    expected: "[index, fields]",
                    found: "malformed pair",
                });
            };
            let index = u64::try_from(i128::from(*index)).map_err(|_| DataError::IntegerOutOfRange)?;
            if index < 128 {
                return Err(DataError::NonCanonical("constructor index has a compact tag"));
            }
            constr_fields(index, fields, depth)
        }
        other => Err(DataError::UnknownTag(other)),
    }
}

fn constr_fields(tag: u64, inner: &Value, depth: usize) -> DataResult<Data> {
    let Value::Array(items) = inner else {
        return Err(DataError::UnexpectedShape {
            expected: "constructor field array",
            found: "non-array",
        });
    };
    let fields = items
        .iter()
        .map(|item| from_value(item, depth + 1))
        .collect::<DataResult<_>>()?;
    Ok(Data::Constr { tag, fields })
}

/// Magnitude of a tagged bignum. The decoder folds bignums of up to 16
/// bytes into plain integers, so only longer or chunked payloads land here.
fn bignum_magnitude(inner: &Value) -> DataResult<u128> {
    let Value::Bytes(bytes) = inner else {
        return Err(DataError::UnexpectedShape {
            expected: "bignum bytes",
            found: "non-bytes",
        });
    };
    if bytes.first() == Some(&0) {
        return Err(DataError::NonCanonical("zero-padded bignum"));
    }
    if bytes.len() > 16 {
        return Err(DataError::IntegerOutOfRange);
    }
    let mut buf = [0u8; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    let magnitude = u128::from_be_bytes(buf);
    if magnitude <= u128::from(u64::MAX) {
        return Err(DataError::NonCanonical("bignum fits in 64 bits"));
    }
    Ok(magnitude)
}
