//! Property tests for the protocol invariants: name pairing, fee bound,
//! burn atomicity and verdict determinism.

mod common;

use common::*;
use lib_data::{MintRedeemer, ProtocolRedeemer};
use lib_protocol::ProtocolStateValidator;
use lib_tokens::{derive_suffix, MintingParams, PairedNames, TokenMintingPolicy};
use lib_types::{ErrorKind, ProtocolConfig, TxHash};
use lib_utxo::{ContextBuilder, OutputReference, TxOut, Value};
use proptest::prelude::*;

fn arb_seed() -> impl Strategy<Value = OutputReference> {
    (any::<[u8; 32]>(), any::<u32>()).prop_map(|(id, index)| OutputReference::new(TxHash::new(id), index))
}

proptest! {
    /// Every accepted mint creates PROTO_s and USER_s with s derived from the seed
    #[test]
    fn prop_mint_pairs_names(seed in arb_seed()) {
        let deployment = Deployment::new().unwrap();
        let (ctx, names) = deployment.mint_tx(seed, 0).unwrap();

        prop_assert!(deployment.host.evaluate(&ctx).is_ok());
        let suffix = derive_suffix(&seed, deployment.config.suffix_len());
        prop_assert_eq!(&names.suffix, &suffix);
        prop_assert_eq!(&names.protocol.as_bytes()[6..], suffix.as_slice());
        prop_assert_eq!(&names.user.as_bytes()[5..], suffix.as_slice());
    }

    /// Distinct seeds never share a suffix in practice
    #[test]
    fn prop_distinct_seeds_distinct_names(a in arb_seed(), b in arb_seed()) {
        prop_assume!(a != b);
        let config = ProtocolConfig::default();
        prop_assert_ne!(
            derive_suffix(&a, config.suffix_len()),
            derive_suffix(&b, config.suffix_len())
        );
    }

    /// An update is accepted exactly when the new fee lies in [0, max_fee]
    #[test]
    fn prop_update_fee_bound(fee in -5_000_000i128..15_000_000i128) {
        let deployment = Deployment::new().unwrap();
        let names = deployment.names_for(&seed_ref()).unwrap();
        let ctx = deployment.update_tx(&names, &datum(1), &datum(fee), key(1)).unwrap();

        let in_range = (0..=deployment.config.max_fee as i128).contains(&fee);
        match deployment.host.evaluate(&ctx) {
            Ok(_) => prop_assert!(in_range),
            Err(err) => {
                prop_assert!(!in_range);
                prop_assert_eq!(err.kind(), ErrorKind::Range);
            }
        }
    }

    /// A burn is accepted exactly when burned PROTO and USER suffixes match
    #[test]
    fn prop_burn_atomicity(
        protocol in prop::collection::btree_set(0u8..6, 0..4),
        user in prop::collection::btree_set(0u8..6, 0..4),
    ) {
        prop_assume!(!protocol.is_empty() || !user.is_empty());
        let config = ProtocolConfig::default();
        let policy = TokenMintingPolicy::new(
            config.clone(),
            MintingParams { burn_admins: vec![key(9)], protocol_script: Some(PROTOCOL_SCRIPT) },
        )
        .unwrap();

        let mut held = Value::lovelace(3_000_000);
        let mut builder = ContextBuilder::new().signer(key(9));
        for (set, protocol_side) in [(&protocol, true), (&user, false)] {
            for byte in set {
                let names = PairedNames::for_suffix(&config, &[*byte; 4]).unwrap();
                let name = if protocol_side { names.protocol } else { names.user };
                held = held.with_asset(POLICY_ID, name.clone(), 1);
                builder = builder.mint(POLICY_ID, name, -1);
            }
        }
        let ctx = builder.input(USER_REF, TxOut::new(wallet(5), held)).build().unwrap();

        let verdict = policy.validate(&ctx, &POLICY_ID, MintRedeemer::Burn);
        if protocol == user {
            prop_assert_eq!(verdict, Ok(()));
        } else {
            prop_assert_eq!(verdict.unwrap_err().kind(), ErrorKind::BurnMismatch);
        }
    }

    /// Re-validating an identical context yields the identical verdict
    #[test]
    fn prop_verdict_is_deterministic(signer in any::<u8>(), fee in -10i128..10) {
        let validator = ProtocolStateValidator::new(ProtocolConfig::default(), POLICY_ID).unwrap();
        let deployment = Deployment::new().unwrap();
        let names = deployment.names_for(&seed_ref()).unwrap();
        let ctx = deployment.update_tx(&names, &datum(0), &datum(fee), key(signer)).unwrap();

        let first = validator.validate(&ctx, &PROTOCOL_REF, &datum(0), ProtocolRedeemer::UpdateProtocol);
        let second = validator.validate(&ctx, &PROTOCOL_REF, &datum(0), ProtocolRedeemer::UpdateProtocol);
        prop_assert_eq!(first, second);
        prop_assert_eq!(deployment.host.evaluate(&ctx), deployment.host.evaluate(&ctx));
    }
}

#[test]
fn test_double_unit_burn_rejected() {
    let config = ProtocolConfig::default();
    let names = PairedNames::for_suffix(&config, &[1u8; 4]).unwrap();
    let ctx = ContextBuilder::new()
        .input(
            USER_REF,
            TxOut::new(
                wallet(5),
                Value::lovelace(1).with_asset(POLICY_ID, names.protocol.clone(), 2),
            ),
        )
        .mint(POLICY_ID, names.protocol.clone(), -1)
        .mint(POLICY_ID, names.protocol.clone(), -1)
        .signer(key(9))
        .build()
        .unwrap();
    let policy = TokenMintingPolicy::new(config, MintingParams {
        burn_admins: vec![key(9)],
        protocol_script: None,
    })
    .unwrap();

    assert_eq!(
        policy.validate(&ctx, &POLICY_ID, MintRedeemer::Burn).unwrap_err().kind(),
        ErrorKind::BurnMismatch
    );
}
