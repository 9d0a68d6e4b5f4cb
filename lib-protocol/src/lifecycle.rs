//! Protocol Lifecycle
//!
//! The protocol UTXO has no stored state field. Whether it is live or ended
//! follows from the transaction shape: a successor output carrying the
//! protocol token keeps it live, none ends it.
//!
//! ```text
//! (mint) ──► Live ──UpdateProtocol──► Live
//!              │
//!              └────EndProtocol────► Ended
//! ```

use lib_data::ProtocolRedeemer;
use serde::{Deserialize, Serialize};

/// Protocol state after a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    Live,
    Ended,
}

impl Lifecycle {
    /// State a redeemer must leave the protocol in
    pub fn expected_for(redeemer: ProtocolRedeemer) -> Self {
        match redeemer {
            ProtocolRedeemer::UpdateProtocol => Lifecycle::Live,
            ProtocolRedeemer::EndProtocol => Lifecycle::Ended,
        }
    }

    /// State implied by the number of outputs carrying the protocol token
    pub fn from_successors(count: usize) -> Self {
        if count == 0 {
            Lifecycle::Ended
        } else {
            Lifecycle::Live
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lifecycle::Live => "live",
            Lifecycle::Ended => "ended",
        }
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
