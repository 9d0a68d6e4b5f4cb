//! Carbon Protocol Data
//!
//! The structured data tree carried by datums and redeemers, its strict
//! CBOR wire format, and the protocol's typed schemas.
//!
//! # Key Types
//!
//! - [`Data`]: constructor / map / list / int / bytes tree
//! - [`ToData`] / [`FromData`]: typed conversion, strict on the way in
//! - [`ProtocolDatum`], [`ProtocolRedeemer`], [`MintRedeemer`]
//!
//! # Usage
//!
//! ```ignore
//! use lib_data::{Data, FromData, ProtocolDatum};
//!
//! let datum = ProtocolDatum::from_data(&Data::from_cbor(&bytes)?)?;
//! ```

pub mod cbor;
pub mod data;
pub mod errors;
pub mod schema;

pub use cbor::MAX_DEPTH;
pub use data::{Data, FromData, ToData};
pub use errors::{DataError, DataResult};
pub use schema::{MintRedeemer, OracleId, ProjectId, ProtocolDatum, ProtocolRedeemer};
