//! Carbon Protocol State
//!
//! The validator guarding the protocol UTXO and the host that conjoins it
//! with the paired-token minting policy.
//!
//! # Key Types
//!
//! - [`ProtocolStateValidator`]: UpdateProtocol / EndProtocol rules
//! - [`Lifecycle`]: live or ended, derived from the transaction shape
//! - [`ScriptHost`]: runs every triggered script and checks conservation
//!
//! # Usage
//!
//! ```ignore
//! use lib_protocol::{ProtocolStateValidator, ScriptHost};
//!
//! let mut host = ScriptHost::new();
//! host.register_spending(script_hash, Box::new(ProtocolStateValidator::new(config, policy_id)?));
//! host.register_minting(policy_id, Box::new(minting_policy));
//! let report = host.evaluate(&ctx)?;
//! ```

pub mod host;
pub mod lifecycle;
pub mod validator;

pub use host::{check_conservation, EvaluationReport, HostError, HostResult, ScriptHost};
pub use lifecycle::Lifecycle;
pub use validator::ProtocolStateValidator;
