//! Script Host
//!
//! Runs every validator a transaction triggers and conjoins the verdicts,
//! the way the ledger does before accepting a transaction.
//!
//! # Evaluation Order
//!
//! 1. **Spending**: each script-locked input runs its script with the
//!    resolved datum and its `Spending` redeemer
//! 2. **Minting**: each policy in the mint field runs its script with its
//!    `Minting` redeemer
//! 3. **Conservation**: `Σ inputs + mint == Σ outputs` per native asset
//!
//! The first failure rejects the whole transaction. Cross-script rules
//! such as "EndProtocol only together with a Burn" hold only here: the
//! protocol validator lets the token leave, the minting policy checks the
//! burn, and conservation forbids the token going anywhere else.

use std::collections::BTreeMap;

use lib_types::{AssetName, ErrorKind, PolicyId, Quantity, ScriptHash, ValidationError};
use lib_utxo::{
    MintingScript, MultiAsset, OutputDatum, OutputReference, ScriptPurpose, SpendingScript,
    TransactionContext,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Error returned when the host rejects a transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Script for {purpose:?} rejected the transaction: {source}")]
    ScriptRejected {
        purpose: ScriptPurpose,
        source: ValidationError,
    },

    #[error("No script registered for {0:?}")]
    MissingScript(ScriptPurpose),

    #[error("No redeemer supplied for {0:?}")]
    MissingRedeemer(ScriptPurpose),

    #[error("Datum hash of input {0:?} not found in the witness set")]
    MissingDatum(OutputReference),

    #[error("Asset {asset} under {policy} not conserved: inputs + mint exceed outputs by {delta}")]
    ValueNotConserved {
        policy: PolicyId,
        asset: AssetName,
        delta: Quantity,
    },
}

impl HostError {
    /// Error kind surfaced to the transaction author
    pub fn kind(&self) -> ErrorKind {
        match self {
            HostError::ScriptRejected { source, .. } => source.kind(),
            _ => ErrorKind::Structural,
        }
    }

    /// The validator error, if a script rejected
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            HostError::ScriptRejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type HostResult<T> = Result<T, HostError>;

/// Scripts run for an accepted transaction, in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scripts_run: Vec<ScriptPurpose>,
}

impl EvaluationReport {
    pub fn ran(&self, purpose: &ScriptPurpose) -> bool {
        self.scripts_run.contains(purpose)
    }
}

/// Registry of deployed scripts
#[derive(Default)]
pub struct ScriptHost {
    spending: BTreeMap<ScriptHash, Box<dyn SpendingScript>>,
    minting: BTreeMap<PolicyId, Box<dyn MintingScript>>,
}

impl ScriptHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the validator guarding outputs locked by `hash`
    pub fn register_spending(&mut self, hash: ScriptHash, script: Box<dyn SpendingScript>) {
        self.spending.insert(hash, script);
    }

    /// Register the policy minting under `policy`
    pub fn register_minting(&mut self, policy: PolicyId, script: Box<dyn MintingScript>) {
        self.minting.insert(policy, script);
    }

    /// Evaluate every script the transaction triggers
    pub fn evaluate(&self, ctx: &TransactionContext) -> HostResult<EvaluationReport> {
        let result = self.run(ctx);
        match &result {
            Ok(report) => debug!(
                "Host accepted tx {} after {} scripts",
                ctx.id,
                report.scripts_run.len()
            ),
            Err(err) => warn!("Host rejected tx {}: {} ({:?})", ctx.id, err, err.kind()),
        }
        result
    }

    fn run(&self, ctx: &TransactionContext) -> HostResult<EvaluationReport> {
        let mut report = EvaluationReport::default();

        for input in &ctx.inputs {
            let Some(hash) = input.resolved.address.script_hash() else {
                continue;
            };
            let purpose = ScriptPurpose::Spending(input.out_ref);
            let script = self
                .spending
                .get(&hash)
                .ok_or(HostError::MissingScript(purpose))?;
            let redeemer = ctx
                .redeemer_for(&purpose)
                .ok_or(HostError::MissingRedeemer(purpose))?;
            let datum = match &input.resolved.datum {
                OutputDatum::None => None,
                carried => Some(
                    ctx.resolve_datum(carried)
                        .ok_or(HostError::MissingDatum(input.out_ref))?,
                ),
            };

            script
                .validate_spend(ctx, &input.out_ref, datum, redeemer)
                .map_err(|source| HostError::ScriptRejected { purpose, source })?;
            report.scripts_run.push(purpose);
        }

        for policy in ctx.mint.policies() {
            let purpose = ScriptPurpose::Minting(*policy);
            let script = self
                .minting
                .get(policy)
                .ok_or(HostError::MissingScript(purpose))?;
            let redeemer = ctx
                .redeemer_for(&purpose)
                .ok_or(HostError::MissingRedeemer(purpose))?;

            script
                .validate_mint(ctx, policy, redeemer)
                .map_err(|source| HostError::ScriptRejected { purpose, source })?;
            report.scripts_run.push(purpose);
        }

        check_conservation(ctx)?;
        Ok(report)
    }
}

/// Native assets in = native assets out, counting mint as input
pub fn check_conservation(ctx: &TransactionContext) -> HostResult<()> {
    let mut balance = MultiAsset::new();
    for input in &ctx.inputs {
        balance.merge(&input.resolved.value.assets);
    }
    balance.merge(&ctx.mint);
    for output in &ctx.outputs {
        for (policy, asset, quantity) in output.value.assets.iter() {
            balance.add(*policy, asset.clone(), -quantity);
        }
    }

    let leftover = balance.iter().next();
    match leftover {
        None => Ok(()),
        Some((policy, asset, delta)) => Err(HostError::ValueNotConserved {
            policy: *policy,
            asset: asset.clone(),
            delta,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_data::Data;
    use lib_types::{KeyHash, TxHash, ValidationResult};
    use lib_utxo::{Address, ContextBuilder, TxOut, Value};

    const SCRIPT: ScriptHash = ScriptHash::new([0xbb; 28]);
    const POLICY: PolicyId = PolicyId::new([0xaa; 28]);

    /// Accepts or rejects everything
    struct Fixed(bool);

    impl Fixed {
        fn verdict(&self) -> ValidationResult<()> {
            if self.0 {
                Ok(())
            } else {
                Err(ValidationError::MissingSignature { required: 1 })
            }
        }
    }

    impl SpendingScript for Fixed {
        fn validate_spend(
            &self,
            _ctx: &TransactionContext,
            _own_ref: &OutputReference,
            _datum: Option<&Data>,
            _redeemer: &Data,
        ) -> ValidationResult<()> {
            self.verdict()
        }
    }

    impl MintingScript for Fixed {
        fn validate_mint(
            &self,
            _ctx: &TransactionContext,
            _own_policy: &PolicyId,
            _redeemer: &Data,
        ) -> ValidationResult<()> {
            self.verdict()
        }
    }

    fn out_ref(n: u8) -> OutputReference {
        OutputReference::new(TxHash::new([n; 32]), 0)
    }

    fn token() -> AssetName {
        AssetName::new(b"TOKEN".to_vec()).unwrap()
    }

    fn wallet() -> Address {
        Address::pub_key(KeyHash::new([1u8; 28]))
    }

    fn host(spend: bool, mint: bool) -> ScriptHost {
        let mut host = ScriptHost::new();
        host.register_spending(SCRIPT, Box::new(Fixed(spend)));
        host.register_minting(POLICY, Box::new(Fixed(mint)));
        host
    }

    #[test]
    fn test_wallet_only_transaction_runs_nothing() {
        let ctx = ContextBuilder::new()
            .input(out_ref(1), TxOut::new(wallet(), Value::lovelace(5_000_000)))
            .output(TxOut::new(wallet(), Value::lovelace(4_800_000)))
            .build()
            .unwrap();
        let report = host(false, false).evaluate(&ctx).unwrap();
        assert!(report.scripts_run.is_empty());
    }

    #[test]
    fn test_script_input_runs_and_rejects() {
        let purpose = ScriptPurpose::Spending(out_ref(2));
        let ctx = ContextBuilder::new()
            .input(
                out_ref(2),
                TxOut::new(Address::script(SCRIPT), Value::lovelace(2_000_000)),
            )
            .redeemer(purpose, &Data::Int(0))
            .build()
            .unwrap();

        assert!(host(true, true).evaluate(&ctx).unwrap().ran(&purpose));

        let err = host(false, true).evaluate(&ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(matches!(err, HostError::ScriptRejected { purpose: p, .. } if p == purpose));
    }

    #[test]
    fn test_missing_script_and_redeemer() {
        let purpose = ScriptPurpose::Spending(out_ref(2));
        let unknown = ContextBuilder::new()
            .input(
                out_ref(2),
                TxOut::new(
                    Address::script(ScriptHash::new([0xcc; 28])),
                    Value::lovelace(2_000_000),
                ),
            )
            .redeemer(purpose, &Data::Int(0))
            .build()
            .unwrap();
        assert_eq!(
            host(true, true).evaluate(&unknown),
            Err(HostError::MissingScript(purpose))
        );

        let no_redeemer = ContextBuilder::new()
            .input(
                out_ref(2),
                TxOut::new(Address::script(SCRIPT), Value::lovelace(2_000_000)),
            )
            .build()
            .unwrap();
        assert_eq!(
            host(true, true).evaluate(&no_redeemer),
            Err(HostError::MissingRedeemer(purpose))
        );
    }

    #[test]
    fn test_unresolved_datum_hash() {
        let out = TxOut::new(Address::script(SCRIPT), Value::lovelace(2_000_000))
            .with_datum_hash(lib_types::DatumHash::new([5u8; 32]));
        let ctx = ContextBuilder::new()
            .input(out_ref(2), out)
            .redeemer(ScriptPurpose::Spending(out_ref(2)), &Data::Int(0))
            .build()
            .unwrap();
        assert_eq!(
            host(true, true).evaluate(&ctx),
            Err(HostError::MissingDatum(out_ref(2)))
        );
    }

    #[test]
    fn test_mint_runs_policy() {
        let ctx = ContextBuilder::new()
            .input(out_ref(1), TxOut::new(wallet(), Value::lovelace(5_000_000)))
            .output(TxOut::new(
                wallet(),
                Value::lovelace(5_000_000).with_asset(POLICY, token(), 1),
            ))
            .mint(POLICY, token(), 1)
            .redeemer(ScriptPurpose::Minting(POLICY), &Data::Int(0))
            .build()
            .unwrap();

        assert!(host(true, true)
            .evaluate(&ctx)
            .unwrap()
            .ran(&ScriptPurpose::Minting(POLICY)));
        assert!(host(true, false).evaluate(&ctx).is_err());
    }

    #[test]
    fn test_conservation() {
        // Minted but never placed in an output
        let ctx = ContextBuilder::new()
            .input(out_ref(1), TxOut::new(wallet(), Value::lovelace(5_000_000)))
            .mint(POLICY, token(), 1)
            .build()
            .unwrap();
        assert_eq!(
            check_conservation(&ctx),
            Err(HostError::ValueNotConserved {
                policy: POLICY,
                asset: token(),
                delta: 1,
            })
        );

        // Output conjured from nothing
        let ctx = ContextBuilder::new()
            .input(out_ref(1), TxOut::new(wallet(), Value::lovelace(5_000_000)))
            .output(TxOut::new(
                wallet(),
                Value::lovelace(1).with_asset(POLICY, token(), 3),
            ))
            .build()
            .unwrap();
        assert!(matches!(
            check_conservation(&ctx),
            Err(HostError::ValueNotConserved { delta: -3, .. })
        ));
    }
}
