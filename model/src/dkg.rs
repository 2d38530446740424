//! Public output of the distributed key generation ceremony.

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// One participant's public share of the DKG output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgParticipant {
    pub node_id: Identifier,
    /// The participant's public key share (opaque threshold-scheme bytes).
    pub share_pub_key: Vec<u8>,
    /// The participant's index in the ceremony.
    pub index: u64,
}

/// The public data produced by the threshold key generation ceremony,
/// needed to verify aggregated consensus signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DkgPublicData {
    /// The group public key (opaque threshold-scheme bytes).
    pub group_pub_key: Vec<u8>,
    pub participants: Vec<DkgParticipant>,
}

impl DkgPublicData {
    /// Look up a participant's public share by node identifier.
    pub fn participant(&self, node_id: &Identifier) -> Option<&DkgParticipant> {
        self.participants.iter().find(|p| &p.node_id == node_id)
    }
}
