//! Typed Datums and Redeemers
//!
//! ```text
//! ProtocolDatum    = Constr 0 [List[Bytes(28)], Int, Bytes(28), Bytes(28)]
//! ProtocolRedeemer = Constr 0 [] (UpdateProtocol) | Constr 1 [] (EndProtocol)
//! MintRedeemer     = Constr 0 [] (Mint)           | Constr 1 [] (Burn)
//! ```

use std::collections::BTreeSet;

use lib_types::{KeyHash, ScriptHash};
use serde::{Deserialize, Serialize};

use crate::data::{Data, FromData, ToData};
use crate::errors::{DataError, DataResult};

/// Identifier of the oracle feeding the protocol
pub type OracleId = ScriptHash;

/// Identifier of the carbon project the protocol tokenizes
pub type ProjectId = ScriptHash;

// =============================================================================
// PROTOCOL DATUM
// =============================================================================

/// State attached to the protocol UTXO
///
/// Only `fee` may change across an update. `admins` is non-empty and free
/// of duplicates; decoding enforces both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDatum {
    pub admins: Vec<KeyHash>,
    pub fee: i128,
    pub oracle_id: OracleId,
    pub project_id: ProjectId,
}

impl ProtocolDatum {
    pub fn new(admins: Vec<KeyHash>, fee: i128, oracle_id: OracleId, project_id: ProjectId) -> Self {
        Self {
            admins,
            fee,
            oracle_id,
            project_id,
        }
    }

    pub fn admin_set(&self) -> BTreeSet<KeyHash> {
        self.admins.iter().copied().collect()
    }

    /// Copy of this datum with a different fee
    pub fn with_fee(&self, fee: i128) -> Self {
        Self {
            fee,
            ..self.clone()
        }
    }
}

impl ToData for ProtocolDatum {
    fn to_data(&self) -> Data {
        Data::constr(
            0,
            vec![
                Data::List(self.admins.iter().map(Data::bytes).collect()),
                Data::Int(self.fee),
                Data::bytes(self.oracle_id),
                Data::bytes(self.project_id),
            ],
        )
    }
}

impl FromData for ProtocolDatum {
    fn from_data(data: &Data) -> DataResult<Self> {
        let (tag, fields) = data.as_constr()?;
        if tag != 0 {
            return Err(DataError::UnknownConstructor {
                type_name: "ProtocolDatum",
                tag,
            });
        }
        let [admins, fee, oracle_id, project_id] = fields else {
            return Err(DataError::WrongArity {
                tag,
                expected: 4,
                found: fields.len(),
            });
        };

        let admins = admins
            .as_list()?
            .iter()
            .map(|item| {
                let bytes = item.as_bytes()?;
                KeyHash::from_slice(bytes).ok_or_else(|| wrong_length("admins", bytes.len()))
            })
            .collect::<DataResult<Vec<_>>>()?;
        if admins.is_empty() {
            return Err(DataError::InvalidField {
                field: "admins",
                reason: "admin set is empty".into(),
            });
        }
        let mut seen = BTreeSet::new();
        if let Some(dup) = admins.iter().find(|key| !seen.insert(**key)) {
            return Err(DataError::InvalidField {
                field: "admins",
                reason: format!("duplicate admin {}", dup),
            });
        }

        Ok(Self {
            admins,
            fee: fee.as_int()?,
            oracle_id: hash28("oracle_id", oracle_id)?,
            project_id: hash28("project_id", project_id)?,
        })
    }
}

fn hash28(field: &'static str, data: &Data) -> DataResult<ScriptHash> {
    let bytes = data.as_bytes()?;
    ScriptHash::from_slice(bytes).ok_or_else(|| wrong_length(field, bytes.len()))
}

fn wrong_length(field: &'static str, len: usize) -> DataError {
    DataError::InvalidField {
        field,
        reason: format!("expected 28 bytes, found {}", len),
    }
}

// =============================================================================
// REDEEMERS
// =============================================================================

/// Action requested of the protocol state validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtocolRedeemer {
    UpdateProtocol,
    EndProtocol,
}

/// Action requested of the paired-token minting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MintRedeemer {
    Mint,
    Burn,
}

/// Decode a payload-free constructor, rejecting any field
fn unit_constr(data: &Data, type_name: &'static str, max_tag: u64) -> DataResult<u64> {
    let (tag, fields) = data.as_constr()?;
    if tag > max_tag {
        return Err(DataError::UnknownConstructor { type_name, tag });
    }
    if !fields.is_empty() {
        return Err(DataError::WrongArity {
            tag,
            expected: 0,
            found: fields.len(),
        });
    }
    Ok(tag)
}

impl ToData for ProtocolRedeemer {
    fn to_data(&self) -> Data {
        match self {
            ProtocolRedeemer::UpdateProtocol => Data::constr(0, vec![]),
            ProtocolRedeemer::EndProtocol => Data::constr(1, vec![]),
        }
    }
}

impl FromData for ProtocolRedeemer {
    fn from_data(data: &Data) -> DataResult<Self> {
        match unit_constr(data, "ProtocolRedeemer", 1)? {
            0 => Ok(ProtocolRedeemer::UpdateProtocol),
            _ => Ok(ProtocolRedeemer::EndProtocol),
        }
    }
}

impl ToData for MintRedeemer {
    fn to_data(&self) -> Data {
        match self {
            MintRedeemer::Mint => Data::constr(0, vec![]),
            MintRedeemer::Burn => Data::constr(1, vec![]),
        }
    }
}

impl FromData for MintRedeemer {
    fn from_data(data: &Data) -> DataResult<Self> {
        match unit_constr(data, "MintRedeemer", 1)? {
            0 => Ok(MintRedeemer::Mint),
            _ => Ok(MintRedeemer::Burn),
        }
    }
}
