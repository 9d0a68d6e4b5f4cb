//! Paired-Token Minting Policy
//!
//! Controls creation and destruction of the protocol-bound and user-bound
//! NFTs.
//!
//! # Mint
//!
//! 1. **Seed**: the first input in ledger order, the lowest output
//!    reference, is the seed
//! 2. **Cardinality**: exactly two assets minted under the policy, 1 each
//! 3. **Names**: `PROTO_<s>` and `USER_<s>` with `s = derive_suffix(seed)`
//! 4. **Genesis** (when the protocol script is configured): the protocol
//!    token lands in one output at that script with a well-formed datum
//!
//! # Burn
//!
//! 1. **Quantities**: every entry under the policy is exactly -1
//! 2. **Pairing**: burned protocol suffixes equal burned user suffixes
//! 3. **Authorization**: the retired protocol datum's admins, or the
//!    policy-level burn keys when no input at the configured protocol
//!    script is being retired

use std::collections::BTreeSet;

use lib_data::{Data, FromData, MintRedeemer, ProtocolDatum};
use lib_types::{
    AssetName, ConfigError, KeyHash, PolicyId, ProtocolConfig, ScriptHash, ValidationError,
    ValidationResult,
};
use lib_utxo::{require_authorized, Address, MintingScript, TransactionContext, TxOut};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::naming::{classify, PairedNames, TokenRole};

/// Parameters baked into one deployment of the policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintingParams {
    /// Keys allowed to burn pairs that are not tied to a protocol UTXO
    pub burn_admins: Vec<KeyHash>,
    /// Protocol validator that must receive the protocol token at mint
    pub protocol_script: Option<ScriptHash>,
}

/// The paired-token minting policy
#[derive(Debug, Clone)]
pub struct TokenMintingPolicy {
    config: ProtocolConfig,
    params: MintingParams,
}

impl TokenMintingPolicy {
    pub fn new(config: ProtocolConfig, params: MintingParams) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, params })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn params(&self) -> &MintingParams {
        &self.params
    }

    /// Validate one invocation with an already decoded redeemer
    pub fn validate(
        &self,
        ctx: &TransactionContext,
        own_policy: &PolicyId,
        redeemer: MintRedeemer,
    ) -> ValidationResult<()> {
        match redeemer {
            MintRedeemer::Mint => self.check_mint(ctx, own_policy).map(|_| ()),
            MintRedeemer::Burn => self.check_burn(ctx, own_policy),
        }
    }

    // =========================================================================
    // Mint
    // =========================================================================

    fn check_mint(&self, ctx: &TransactionContext, policy: &PolicyId) -> ValidationResult<PairedNames> {
        let seed = ctx
            .inputs
            .first()
            .map(|input| input.out_ref)
            .ok_or(ValidationError::MissingSeedInput)?;

        let minted = ctx.minted_under(policy);
        if let Some((asset, _)) = minted.iter().find(|(_, qty)| *qty < 0) {
            return Err(ValidationError::BurnDuringMint {
                asset: asset.clone(),
            });
        }
        if minted.len() != 2 {
            return Err(ValidationError::MintCardinality {
                expected: 2,
                found: minted.len(),
            });
        }
        if let Some((asset, quantity)) = minted.iter().find(|(_, qty)| *qty != 1) {
            return Err(ValidationError::MintQuantity {
                asset: asset.clone(),
                quantity: *quantity,
            });
        }

        let expected = PairedNames::derive(&self.config, &seed).ok_or_else(|| {
            ValidationError::MalformedData("configured prefix exceeds asset name limit".into())
        })?;
        for role in [TokenRole::Protocol, TokenRole::User] {
            let wanted = expected.name(role);
            if minted.iter().any(|(name, _)| name == wanted) {
                continue;
            }
            let found = minted
                .iter()
                .map(|(name, _)| name)
                .find(|name| *name != &expected.protocol && *name != &expected.user)
                .cloned()
                .unwrap_or_default();
            return Err(ValidationError::NameMismatch {
                expected: wanted.clone(),
                found,
            });
        }

        if let Some(script) = self.params.protocol_script {
            self.check_genesis_output(ctx, policy, &expected.protocol, script)?;
        }
        Ok(expected)
    }

    fn check_genesis_output(
        &self,
        ctx: &TransactionContext,
        policy: &PolicyId,
        protocol_token: &AssetName,
        script: ScriptHash,
    ) -> ValidationResult<()> {
        let carriers: Vec<&TxOut> = ctx
            .outputs
            .iter()
            .filter(|output| output.holds(policy, protocol_token))
            .collect();
        let [output] = carriers.as_slice() else {
            return Err(ValidationError::GenesisOutput(format!(
                "expected 1 output carrying the protocol token, found {}",
                carriers.len()
            )));
        };
        if output.address.script_hash() != Some(script) {
            return Err(ValidationError::GenesisOutput(
                "protocol token is not locked by the protocol validator".into(),
            ));
        }
        let quantity = output.value.quantity_of(policy, protocol_token);
        if quantity != 1 {
            return Err(ValidationError::ProtocolOutputQuantity { quantity });
        }

        let data = ctx
            .resolve_datum(&output.datum)
            .ok_or(ValidationError::MissingDatum)?;
        let datum = ProtocolDatum::from_data(data)?;
        if !self.config.fee_in_range(datum.fee) {
            return Err(ValidationError::FeeOutOfRange {
                fee: datum.fee,
                max: self.config.max_fee,
            });
        }
        Ok(())
    }

    // =========================================================================
    // Burn
    // =========================================================================

    fn check_burn(&self, ctx: &TransactionContext, policy: &PolicyId) -> ValidationResult<()> {
        let burned = ctx.minted_under(policy);
        if burned.is_empty() {
            return Err(ValidationError::NothingBurned);
        }

        let mut protocol_suffixes: BTreeSet<&[u8]> = BTreeSet::new();
        let mut user_suffixes: BTreeSet<&[u8]> = BTreeSet::new();
        let mut protocol_tokens: Vec<&AssetName> = Vec::new();

        for (asset, quantity) in &burned {
            if *quantity > 0 {
                return Err(ValidationError::MintDuringBurn {
                    asset: asset.clone(),
                });
            }
            if *quantity != -1 {
                return Err(ValidationError::BurnQuantity {
                    asset: asset.clone(),
                    quantity: *quantity,
                });
            }
            match classify(&self.config, asset) {
                Some((TokenRole::Protocol, suffix)) => {
                    protocol_suffixes.insert(suffix);
                    protocol_tokens.push(asset);
                }
                Some((TokenRole::User, suffix)) => {
                    user_suffixes.insert(suffix);
                }
                None => {
                    return Err(ValidationError::UnknownBurnName {
                        asset: asset.clone(),
                    })
                }
            }
        }

        if let Some(suffix) = protocol_suffixes.symmetric_difference(&user_suffixes).next() {
            return Err(ValidationError::UnpairedBurn {
                suffix: hex::encode(suffix),
            });
        }

        self.check_burn_authorization(ctx, policy, &protocol_tokens)
    }

    /// Each retired protocol UTXO needs its own datum's admins; pairs not
    /// tied to a protocol UTXO need the policy-level burn keys.
    fn check_burn_authorization(
        &self,
        ctx: &TransactionContext,
        policy: &PolicyId,
        protocol_tokens: &[&AssetName],
    ) -> ValidationResult<()> {
        let mut needs_policy_keys = false;

        for token in protocol_tokens {
            let retired = ctx.inputs.iter().find(|input| {
                input.resolved.holds(policy, token) && self.is_protocol_lock(&input.resolved.address)
            });
            match retired {
                Some(input) => {
                    let data = ctx
                        .resolve_datum(&input.resolved.datum)
                        .ok_or(ValidationError::MissingDatum)?;
                    let datum = ProtocolDatum::from_data(data)?;
                    require_authorized(&datum.admins, &ctx.signatories)?;
                }
                None => needs_policy_keys = true,
            }
        }

        if needs_policy_keys {
            require_authorized(&self.params.burn_admins, &ctx.signatories)?;
        }
        Ok(())
    }

    /// Only the configured protocol validator vouches for a datum. Without
    /// one, every burn falls back to the policy-level keys.
    fn is_protocol_lock(&self, address: &Address) -> bool {
        match self.params.protocol_script {
            Some(script) => address.script_hash() == Some(script),
            None => false,
        }
    }
}

impl MintingScript for TokenMintingPolicy {
    fn validate_mint(
        &self,
        ctx: &TransactionContext,
        own_policy: &PolicyId,
        redeemer: &Data,
    ) -> ValidationResult<()> {
        let action = MintRedeemer::from_data(redeemer)?;
        match self.validate(ctx, own_policy, action) {
            Ok(()) => {
                debug!("Minting policy {} accepted {:?} in tx {}", own_policy, action, ctx.id);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "Minting policy {} rejected {:?} in tx {}: {} ({:?})",
                    own_policy,
                    action,
                    ctx.id,
                    err,
                    err.kind()
                );
                Err(err)
            }
        }
    }
}
