//! Shared fixtures for the protocol integration suites.
//!
//! A [`Deployment`] wires the protocol validator and the paired-token policy
//! into one [`ScriptHost`], and the `*_tx` helpers build the transactions
//! each lifecycle step submits.

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use lib_data::{MintRedeemer, ProtocolDatum, ProtocolRedeemer};
use lib_protocol::{ProtocolStateValidator, ScriptHost};
use lib_tokens::{MintingParams, PairedNames, TokenMintingPolicy};
use lib_types::{KeyHash, PolicyId, ProtocolConfig, ScriptHash, TxHash};
use lib_utxo::{
    Address, ContextBuilder, OutputReference, ScriptPurpose, TransactionContext, TxOut, Value,
};

pub const POLICY_ID: PolicyId = PolicyId::new([0xa1; 28]);
pub const PROTOCOL_SCRIPT: ScriptHash = ScriptHash::new([0xb2; 28]);
pub const ORACLE_ID: ScriptHash = ScriptHash::new([0x0c; 28]);
pub const PROJECT_ID: ScriptHash = ScriptHash::new([0x0d; 28]);

/// Protocol UTXO reference used by update and end scenarios
pub const PROTOCOL_REF: OutputReference = OutputReference::new(TxHash::new([0x70; 32]), 0);
/// Wallet UTXO holding the user token
pub const USER_REF: OutputReference = OutputReference::new(TxHash::new([0x71; 32]), 1);

/// Route `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn key(n: u8) -> KeyHash {
    KeyHash::new([n; 28])
}

pub fn wallet(n: u8) -> Address {
    Address::pub_key(key(n))
}

/// Admins k1, k2
pub fn datum(fee: i128) -> ProtocolDatum {
    ProtocolDatum::new(vec![key(1), key(2)], fee, ORACLE_ID, PROJECT_ID)
}

pub fn seed_ref() -> OutputReference {
    OutputReference::new(TxHash::new([0x5e; 32]), 0)
}

pub struct Deployment {
    pub config: ProtocolConfig,
    pub host: ScriptHost,
}

impl Deployment {
    pub fn new() -> Result<Self> {
        Self::with_config(ProtocolConfig::default())
    }

    pub fn with_config(config: ProtocolConfig) -> Result<Self> {
        let validator = ProtocolStateValidator::new(config.clone(), POLICY_ID)?;
        let policy = TokenMintingPolicy::new(
            config.clone(),
            MintingParams {
                burn_admins: vec![key(9)],
                protocol_script: Some(PROTOCOL_SCRIPT),
            },
        )?;

        let mut host = ScriptHost::new();
        host.register_spending(PROTOCOL_SCRIPT, Box::new(validator));
        host.register_minting(POLICY_ID, Box::new(policy));
        Ok(Self { config, host })
    }

    pub fn names_for(&self, seed: &OutputReference) -> Result<PairedNames> {
        PairedNames::derive(&self.config, seed).ok_or_else(|| anyhow!("names exceed limit"))
    }

    /// Live protocol UTXO carrying `datum` and the protocol token
    pub fn protocol_utxo(&self, names: &PairedNames, datum: &ProtocolDatum) -> TxOut {
        TxOut::new(
            Address::script(PROTOCOL_SCRIPT),
            Value::lovelace(2_000_000).with_asset(POLICY_ID, names.protocol.clone(), 1),
        )
        .with_inline_datum(lib_data::ToData::to_data(datum))
    }

    pub fn user_utxo(&self, names: &PairedNames) -> TxOut {
        TxOut::new(
            wallet(5),
            Value::lovelace(1_500_000).with_asset(POLICY_ID, names.user.clone(), 1),
        )
    }

    /// Genesis: consume the seed, send PROTO to the validator, USER to a wallet
    pub fn mint_tx(&self, seed: OutputReference, fee: i128) -> Result<(TransactionContext, PairedNames)> {
        let names = self.names_for(&seed)?;
        let ctx = ContextBuilder::new()
            .input(seed, TxOut::new(wallet(5), Value::lovelace(20_000_000)))
            .output(self.protocol_utxo(&names, &datum(fee)))
            .output(self.user_utxo(&names))
            .mint(POLICY_ID, names.protocol.clone(), 1)
            .mint(POLICY_ID, names.user.clone(), 1)
            .redeemer(ScriptPurpose::Minting(POLICY_ID), &MintRedeemer::Mint)
            .signer(key(5))
            .build()?;
        Ok((ctx, names))
    }

    /// Move the protocol UTXO forward with a new datum
    pub fn update_tx(
        &self,
        names: &PairedNames,
        current: &ProtocolDatum,
        next: &ProtocolDatum,
        signer: KeyHash,
    ) -> Result<TransactionContext> {
        Ok(ContextBuilder::new()
            .input(PROTOCOL_REF, self.protocol_utxo(names, current))
            .output(self.protocol_utxo(names, next))
            .redeemer(
                ScriptPurpose::Spending(PROTOCOL_REF),
                &ProtocolRedeemer::UpdateProtocol,
            )
            .signer(signer)
            .build()?)
    }

    /// Retire the protocol UTXO; `burn` adds the paired burn
    pub fn end_tx(
        &self,
        names: &PairedNames,
        current: &ProtocolDatum,
        burn: bool,
        signer: KeyHash,
    ) -> Result<TransactionContext> {
        let mut builder = ContextBuilder::new()
            .input(PROTOCOL_REF, self.protocol_utxo(names, current))
            .output(TxOut::new(wallet(5), Value::lovelace(1_800_000)))
            .redeemer(
                ScriptPurpose::Spending(PROTOCOL_REF),
                &ProtocolRedeemer::EndProtocol,
            )
            .signer(signer);
        if burn {
            builder = builder
                .input(USER_REF, self.user_utxo(names))
                .mint(POLICY_ID, names.protocol.clone(), -1)
                .mint(POLICY_ID, names.user.clone(), -1)
                .redeemer(ScriptPurpose::Minting(POLICY_ID), &MintRedeemer::Burn);
        }
        Ok(builder.build()?)
    }
}
