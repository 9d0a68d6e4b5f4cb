//! Protocol State Validator
//!
//! Guards the UTXO that carries the protocol token and its `ProtocolDatum`.
//!
//! # Rules
//!
//! 1. **Linear input**: exactly one input carries the protocol token, and it
//!    is the input being validated
//! 2. **Lifecycle**: UpdateProtocol leaves one successor, EndProtocol none
//! 3. **Successor**: locked by the same script, quantity 1, with a datum
//! 4. **Immutability**: the admin set, `oracle_id`, `project_id` unchanged
//! 5. **Range**: the new fee lies in `[0, max_fee]`
//! 6. **Authorization**: one of the input datum's admins signed
//!
//! EndProtocol also needs a coincident burn of the token pair. That rule
//! lives in [`crate::host::ScriptHost`], which conjoins both verdicts.

use lib_data::{Data, FromData, ProtocolDatum, ProtocolRedeemer};
use lib_tokens::{classify, TokenRole};
use lib_types::{
    AssetName, ConfigError, PolicyId, ProtocolConfig, ScriptHash, ValidationError,
    ValidationResult,
};
use lib_utxo::{require_authorized, OutputReference, SpendingScript, TransactionContext, TxOut};
use tracing::{debug, warn};

use crate::lifecycle::Lifecycle;

/// Validator for the protocol UTXO
#[derive(Debug, Clone)]
pub struct ProtocolStateValidator {
    config: ProtocolConfig,
    nft_policy: PolicyId,
}

impl ProtocolStateValidator {
    /// Create a validator bound to the paired-token policy
    pub fn new(config: ProtocolConfig, nft_policy: PolicyId) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, nft_policy })
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn nft_policy(&self) -> &PolicyId {
        &self.nft_policy
    }

    /// The single protocol-prefixed asset under the policy held by `output`
    pub fn protocol_token(&self, output: &TxOut) -> ValidationResult<AssetName> {
        let tokens: Vec<&AssetName> = output
            .value
            .assets
            .tokens_of(&self.nft_policy)
            .filter(|(name, _)| matches!(classify(&self.config, name), Some((TokenRole::Protocol, _))))
            .map(|(name, _)| name)
            .collect();

        match tokens.as_slice() {
            [token] => Ok((*token).clone()),
            _ => Err(ValidationError::ProtocolTokenAmbiguous {
                found: tokens.len(),
            }),
        }
    }

    /// Validate spending `own_ref` with a decoded datum and redeemer
    pub fn validate(
        &self,
        ctx: &TransactionContext,
        own_ref: &OutputReference,
        datum: &ProtocolDatum,
        redeemer: ProtocolRedeemer,
    ) -> ValidationResult<()> {
        let own = ctx
            .find_input(own_ref)
            .ok_or(ValidationError::OwnInputMissing)?;
        let own_script = own.resolved.address.script_hash().ok_or_else(|| {
            ValidationError::WrongPurpose("spent input is not locked by a script".into())
        })?;
        let token = self.protocol_token(&own.resolved)?;

        // =====================================================================
        // Linear input
        // =====================================================================
        let carriers: Vec<&OutputReference> = ctx
            .inputs
            .iter()
            .filter(|input| input.resolved.holds(&self.nft_policy, &token))
            .map(|input| &input.out_ref)
            .collect();
        if carriers.len() != 1 {
            return Err(ValidationError::ProtocolInputCount {
                found: carriers.len(),
            });
        }
        if carriers[0] != own_ref {
            return Err(ValidationError::ProtocolInputNotOwn);
        }

        // =====================================================================
        // Lifecycle
        // =====================================================================
        let successors: Vec<&TxOut> = ctx
            .outputs
            .iter()
            .filter(|output| output.holds(&self.nft_policy, &token))
            .collect();
        let expected = Lifecycle::expected_for(redeemer);
        let found = Lifecycle::from_successors(successors.len());
        if expected != found {
            return Err(ValidationError::LifecycleMismatch {
                expected: expected.as_str(),
                found: found.as_str(),
            });
        }

        match redeemer {
            ProtocolRedeemer::UpdateProtocol => {
                let [successor] = successors.as_slice() else {
                    return Err(ValidationError::ProtocolOutputCount {
                        expected: 1,
                        found: successors.len(),
                    });
                };
                self.check_successor(ctx, successor, own_script, &token, datum)?;
            }
            ProtocolRedeemer::EndProtocol => {}
        }

        require_authorized(&datum.admins, &ctx.signatories)
    }

    fn check_successor(
        &self,
        ctx: &TransactionContext,
        successor: &TxOut,
        own_script: ScriptHash,
        token: &AssetName,
        current: &ProtocolDatum,
    ) -> ValidationResult<()> {
        if successor.address.script_hash() != Some(own_script) {
            return Err(ValidationError::ProtocolOutputForeign);
        }
        let quantity = successor.value.quantity_of(&self.nft_policy, token);
        if quantity != 1 {
            return Err(ValidationError::ProtocolOutputQuantity { quantity });
        }

        let data = ctx
            .resolve_datum(&successor.datum)
            .ok_or(ValidationError::MissingDatum)?;
        let next = ProtocolDatum::from_data(data)?;

        if next.admin_set() != current.admin_set() {
            return Err(ValidationError::ImmutableFieldChanged { field: "admins" });
        }
        if next.oracle_id != current.oracle_id {
            return Err(ValidationError::ImmutableFieldChanged { field: "oracle_id" });
        }
        if next.project_id != current.project_id {
            return Err(ValidationError::ImmutableFieldChanged { field: "project_id" });
        }
        if !self.config.fee_in_range(next.fee) {
            return Err(ValidationError::FeeOutOfRange {
                fee: next.fee,
                max: self.config.max_fee,
            });
        }
        Ok(())
    }
}

impl SpendingScript for ProtocolStateValidator {
    fn validate_spend(
        &self,
        ctx: &TransactionContext,
        own_ref: &OutputReference,
        datum: Option<&Data>,
        redeemer: &Data,
    ) -> ValidationResult<()> {
        let datum = ProtocolDatum::from_data(datum.ok_or(ValidationError::MissingDatum)?)?;
        let action = ProtocolRedeemer::from_data(redeemer)?;

        let result = self.validate(ctx, own_ref, &datum, action);
        match &result {
            Ok(()) => debug!(
                "Protocol validator accepted {:?} of {}#{} in tx {}",
                action, own_ref.tx_id, own_ref.index, ctx.id
            ),
            Err(err) => warn!(
                "Protocol validator rejected {:?} of {}#{} in tx {}: {} ({:?})",
                action,
                own_ref.tx_id,
                own_ref.index,
                ctx.id,
                err,
                err.kind()
            ),
        }
        result
    }
}
