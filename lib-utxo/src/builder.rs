//! Transaction Context Builder
//!
//! Assembles a [`TransactionContext`] the way a host ledger would present
//! it to validators. Used by host tooling and by every validator test.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use lib_data::{Data, ToData};
use lib_types::{AssetName, DatumHash, KeyHash, PolicyId, Quantity, TxHash};

use crate::errors::{UtxoError, UtxoResult};
use crate::types::{
    Address, MultiAsset, OutputDatum, OutputReference, ScriptPurpose, TransactionContext, TxInInfo,
    TxOut, Value,
};

/// Domain separator for derived transaction ids
const TX_ID_DOMAIN: &[u8] = b"CARBON_TX_ID_V1";

/// Fluent builder for [`TransactionContext`]
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    id: Option<TxHash>,
    inputs: Vec<TxInInfo>,
    outputs: Vec<TxOut>,
    mint: MultiAsset,
    signatories: BTreeSet<KeyHash>,
    datums: Vec<Data>,
    redeemers: BTreeMap<ScriptPurpose, Data>,
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the transaction id instead of deriving it
    pub fn id(mut self, id: TxHash) -> Self {
        self.id = Some(id);
        self
    }

    pub fn input(mut self, out_ref: OutputReference, resolved: TxOut) -> Self {
        self.inputs.push(TxInInfo { out_ref, resolved });
        self
    }

    /// Spend an output whose datum is carried by hash
    pub fn input_with_hashed_datum(
        self,
        out_ref: OutputReference,
        address: Address,
        value: Value,
        datum: &impl ToData,
    ) -> UtxoResult<Self> {
        let data = datum.to_data();
        let hash = data.hash()?;
        Ok(self
            .input(out_ref, TxOut::new(address, value).with_datum_hash(hash))
            .datum(data))
    }

    pub fn output(mut self, output: TxOut) -> Self {
        self.outputs.push(output);
        self
    }

    /// Produce an output whose datum is carried by hash
    pub fn output_with_hashed_datum(
        self,
        address: Address,
        value: Value,
        datum: &impl ToData,
    ) -> UtxoResult<Self> {
        let data = datum.to_data();
        let hash = data.hash()?;
        Ok(self
            .output(TxOut::new(address, value).with_datum_hash(hash))
            .datum(data))
    }

    /// Mint (positive) or burn (negative) an asset
    pub fn mint(mut self, policy: PolicyId, name: AssetName, quantity: Quantity) -> Self {
        self.mint.add(policy, name, quantity);
        self
    }

    pub fn signer(mut self, key: KeyHash) -> Self {
        self.signatories.insert(key);
        self
    }

    /// Attach a witness datum
    pub fn datum(mut self, data: Data) -> Self {
        self.datums.push(data);
        self
    }

    pub fn redeemer(mut self, purpose: ScriptPurpose, redeemer: &impl ToData) -> Self {
        self.redeemers.insert(purpose, redeemer.to_data());
        self
    }

    /// Validate shape and produce the immutable context. Inputs come out
    /// sorted by output reference, the order a ledger presents them in.
    pub fn build(mut self) -> UtxoResult<TransactionContext> {
        if self.inputs.is_empty() {
            return Err(UtxoError::EmptyInputs);
        }

        let mut seen: HashSet<OutputReference> = HashSet::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if !seen.insert(input.out_ref) {
                return Err(UtxoError::DuplicateInput(input.out_ref));
            }
        }
        self.inputs.sort_by_key(|input| input.out_ref);

        let mut datums: BTreeMap<DatumHash, Data> = BTreeMap::new();
        for data in self.datums {
            datums.insert(data.hash()?, data);
        }

        let id = match self.id {
            Some(id) => id,
            None => derive_tx_id(&self.inputs, self.outputs.len(), &self.signatories),
        };

        Ok(TransactionContext {
            id,
            inputs: self.inputs,
            outputs: self.outputs,
            mint: self.mint,
            signatories: self.signatories,
            datums,
            redeemers: self.redeemers,
        })
    }
}

fn derive_tx_id(inputs: &[TxInInfo], output_count: usize, signers: &BTreeSet<KeyHash>) -> TxHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(TX_ID_DOMAIN);
    for input in inputs {
        hasher.update(&input.out_ref.to_bytes());
    }
    hasher.update(&(output_count as u64).to_be_bytes());
    for key in signers {
        hasher.update(key.as_bytes());
    }
    TxHash::new(hasher.finalize().into())
}
