//! Consensus artifacts consumed by the supervisor.

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;

/// An aggregated proof that a threshold of consensus participants voted for
/// a given block. The supervisor treats the signature material as opaque;
/// verification belongs to the consensus engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumCertificate {
    pub view: u64,
    pub block_id: Identifier,
    pub signer_ids: Vec<Identifier>,
    pub sig_data: Vec<u8>,
}
