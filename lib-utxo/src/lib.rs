//! Carbon Protocol Transaction Context
//!
//! The read-only transaction view that the host ledger assembles and hands
//! to every validator, plus the helpers validators share.
//!
//! # Key Rules
//!
//! 1. **Host-owned**: validators only read a [`TransactionContext`]
//! 2. **Unique inputs**: each UTXO reference appears at most once
//! 3. **Any-of authorization**: one signature from a required set suffices
//!
//! # Usage
//!
//! ```ignore
//! use lib_utxo::{ContextBuilder, OutputReference, TxOut};
//!
//! let ctx = ContextBuilder::new()
//!     .input(seed_ref, wallet_output)
//!     .output(protocol_output)
//!     .build()?;
//! ```

pub mod auth;
pub mod builder;
pub mod errors;
pub mod script;
pub mod types;

pub use auth::{is_authorized, require_authorized};
pub use builder::ContextBuilder;
pub use errors::{UtxoError, UtxoResult};
pub use script::{MintingScript, SpendingScript};
pub use types::*;
