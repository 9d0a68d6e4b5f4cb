//! Carbon Protocol Paired Tokens
//!
//! Naming and minting rules for the protocol-bound and user-bound NFTs.
//!
//! # Key Types
//!
//! - [`PairedNames`]: the two names one mint produces
//! - [`TokenMintingPolicy`]: validates Mint and Burn transactions
//! - [`MintingParams`]: per-deployment burn keys and protocol script
//!
//! # Usage
//!
//! ```ignore
//! use lib_tokens::{MintingParams, TokenMintingPolicy};
//!
//! let policy = TokenMintingPolicy::new(config, params)?;
//! policy.validate(&ctx, &policy_id, MintRedeemer::Mint)?;
//! ```

pub mod naming;
pub mod policy;

pub use naming::{classify, derive_suffix, PairedNames, TokenRole};
pub use policy::{MintingParams, TokenMintingPolicy};
