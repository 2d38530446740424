//! Node identities recorded in protocol state.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifier::Identifier;
use crate::keys::PublicKey;

/// The role a node plays in the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Collection,
    Consensus,
    Execution,
    Verification,
    Access,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Collection => "collection",
            Role::Consensus => "consensus",
            Role::Execution => "execution",
            Role::Verification => "verification",
            Role::Access => "access",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staked node identity as recorded in the root block's identity table and
/// persisted in protocol state. The public keys here are the reference the
/// supervisor checks the locally configured private keys against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub node_id: Identifier,
    pub role: Role,
    /// Network address other nodes dial, e.g. "node-1.example.org:3569".
    pub address: String,
    pub staking_pub_key: PublicKey,
    pub network_pub_key: PublicKey,
    pub stake: u64,
}
