//! Transaction Context Types
//!
//! The read-only view of a fully formed transaction that the host ledger
//! hands to every validator invocation.

use std::collections::{BTreeMap, BTreeSet};

use lib_data::Data;
use lib_types::{AssetName, DatumHash, KeyHash, Lovelace, PolicyId, Quantity, ScriptHash, TxHash};
use serde::{Deserialize, Serialize};

/// OutputReference - Reference to a specific output of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputReference {
    /// Id of the transaction that produced the output
    pub tx_id: TxHash,
    /// Index of the output in that transaction
    pub index: u32,
}

impl OutputReference {
    pub const fn new(tx_id: TxHash, index: u32) -> Self {
        Self { tx_id, index }
    }

    /// Serialized form fed to name derivation: `tx_id || index (big-endian)`
    pub fn to_bytes(&self) -> [u8; 36] {
        let mut bytes = [0u8; 36];
        bytes[..32].copy_from_slice(self.tx_id.as_bytes());
        bytes[32..36].copy_from_slice(&self.index.to_be_bytes());
        bytes
    }
}

// =============================================================================
// ADDRESSES
// =============================================================================

/// Who controls an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Credential {
    PubKey(KeyHash),
    Script(ScriptHash),
}

/// Payment credential plus optional staking credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub payment: Credential,
    pub stake: Option<Credential>,
}

impl Address {
    pub fn pub_key(key: KeyHash) -> Self {
        Self {
            payment: Credential::PubKey(key),
            stake: None,
        }
    }

    pub fn script(hash: ScriptHash) -> Self {
        Self {
            payment: Credential::Script(hash),
            stake: None,
        }
    }

    /// Script hash of the payment credential, if script-locked
    pub fn script_hash(&self) -> Option<ScriptHash> {
        match self.payment {
            Credential::Script(hash) => Some(hash),
            Credential::PubKey(_) => None,
        }
    }
}

// =============================================================================
// VALUE
// =============================================================================

/// Native assets keyed by policy then name. Zero quantities are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiAsset(BTreeMap<PolicyId, BTreeMap<AssetName, Quantity>>);

impl MultiAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of an asset, pruning entries that reach zero
    pub fn add(&mut self, policy: PolicyId, name: AssetName, quantity: Quantity) {
        let assets = self.0.entry(policy).or_default();
        let entry = assets.entry(name.clone()).or_insert(0);
        *entry += quantity;
        if *entry == 0 {
            assets.remove(&name);
        }
        if assets.is_empty() {
            self.0.remove(&policy);
        }
    }

    /// Add every entry of `other`
    pub fn merge(&mut self, other: &MultiAsset) {
        for (policy, name, quantity) in other.iter() {
            self.add(*policy, name.clone(), quantity);
        }
    }

    pub fn quantity_of(&self, policy: &PolicyId, name: &AssetName) -> Quantity {
        self.0
            .get(policy)
            .and_then(|assets| assets.get(name))
            .copied()
            .unwrap_or(0)
    }

    /// All entries under one policy, empty if none
    pub fn tokens_of(&self, policy: &PolicyId) -> impl Iterator<Item = (&AssetName, Quantity)> {
        self.0
            .get(policy)
            .into_iter()
            .flat_map(|assets| assets.iter().map(|(name, qty)| (name, *qty)))
    }

    pub fn policies(&self) -> impl Iterator<Item = &PolicyId> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PolicyId, &AssetName, Quantity)> {
        self.0
            .iter()
            .flat_map(|(policy, assets)| assets.iter().map(move |(name, qty)| (policy, name, *qty)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Value held by an output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub lovelace: Lovelace,
    pub assets: MultiAsset,
}

impl Value {
    pub fn lovelace(lovelace: Lovelace) -> Self {
        Self {
            lovelace,
            assets: MultiAsset::new(),
        }
    }

    /// Builder-style: add a native asset
    pub fn with_asset(mut self, policy: PolicyId, name: AssetName, quantity: Quantity) -> Self {
        self.assets.add(policy, name, quantity);
        self
    }

    pub fn quantity_of(&self, policy: &PolicyId, name: &AssetName) -> Quantity {
        self.assets.quantity_of(policy, name)
    }
}

// =============================================================================
// OUTPUTS AND INPUTS
// =============================================================================

/// Datum attached to an output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputDatum {
    None,
    /// Hash only; the datum itself travels in the transaction's witness set
    Hash(DatumHash),
    Inline(Data),
}

/// Transaction output (new UTXO being created, or the UTXO an input spends)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub address: Address,
    pub value: Value,
    pub datum: OutputDatum,
}

impl TxOut {
    pub fn new(address: Address, value: Value) -> Self {
        Self {
            address,
            value,
            datum: OutputDatum::None,
        }
    }

    pub fn with_inline_datum(mut self, datum: Data) -> Self {
        self.datum = OutputDatum::Inline(datum);
        self
    }

    pub fn with_datum_hash(mut self, hash: DatumHash) -> Self {
        self.datum = OutputDatum::Hash(hash);
        self
    }

    pub fn holds(&self, policy: &PolicyId, name: &AssetName) -> bool {
        self.value.quantity_of(policy, name) != 0
    }
}

/// Transaction input, resolved to the output it spends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInInfo {
    pub out_ref: OutputReference,
    pub resolved: TxOut,
}

/// Why a script is being run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScriptPurpose {
    /// Spending the script-locked output at this reference
    Spending(OutputReference),
    /// Minting or burning under this policy
    Minting(PolicyId),
}

// =============================================================================
// TRANSACTION CONTEXT
// =============================================================================

/// Immutable snapshot of a transaction, owned and assembled by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    pub id: TxHash,
    /// Spent outputs, in ledger order
    pub inputs: Vec<TxInInfo>,
    /// Produced outputs, in ledger order
    pub outputs: Vec<TxOut>,
    /// Minted (positive) and burned (negative) quantities
    pub mint: MultiAsset,
    pub signatories: BTreeSet<KeyHash>,
    /// Witness datums, keyed by hash
    pub datums: BTreeMap<DatumHash, Data>,
    pub redeemers: BTreeMap<ScriptPurpose, Data>,
}

impl TransactionContext {
    pub fn find_input(&self, out_ref: &OutputReference) -> Option<&TxInInfo> {
        self.inputs.iter().find(|input| input.out_ref == *out_ref)
    }

    /// Datum carried by an output, following hashes into the witness set
    pub fn resolve_datum<'a>(&'a self, datum: &'a OutputDatum) -> Option<&'a Data> {
        match datum {
            OutputDatum::None => None,
            OutputDatum::Hash(hash) => self.datums.get(hash),
            OutputDatum::Inline(data) => Some(data),
        }
    }

    /// Mint entries under one policy
    pub fn minted_under(&self, policy: &PolicyId) -> Vec<(AssetName, Quantity)> {
        self.mint
            .tokens_of(policy)
            .map(|(name, qty)| (name.clone(), qty))
            .collect()
    }

    pub fn is_signed_by(&self, key: &KeyHash) -> bool {
        self.signatories.contains(key)
    }

    pub fn redeemer_for(&self, purpose: &ScriptPurpose) -> Option<&Data> {
        self.redeemers.get(purpose)
    }
}
