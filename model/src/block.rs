//! Blocks, headers, and payloads.

use serde::{Deserialize, Serialize};

use crate::collection::CollectionGuarantee;
use crate::identifier::{ChainId, Identifier};
use crate::identity::Identity;
use crate::result::Seal;

/// A block header. The header identifier is the block identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The chain this block extends.
    pub chain_id: ChainId,
    /// Identifier of the parent block (zero for the root block).
    pub parent_id: Identifier,
    /// Height above the root block.
    pub height: u64,
    /// Hash of the block payload.
    pub payload_hash: Identifier,
    /// Unix timestamp in milliseconds at which the block was proposed.
    pub timestamp_ms: u64,
    /// Consensus view in which the block was proposed.
    pub view: u64,
    /// Identifier of the proposing node.
    pub proposer_id: Identifier,
}

impl Header {
    pub fn id(&self) -> Identifier {
        Identifier::of(self)
    }
}

/// The payload of a block: the identity table (non-empty only in the root
/// block), collection guarantees, and block seals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub identities: Vec<Identity>,
    pub guarantees: Vec<CollectionGuarantee>,
    pub seals: Vec<Seal>,
}

impl Payload {
    pub fn hash(&self) -> Identifier {
        Identifier::of(self)
    }
}

/// A full block: header plus payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: Header,
    pub payload: Payload,
}

impl Block {
    /// The block identifier is the header identifier.
    pub fn id(&self) -> Identifier {
        self.header.id()
    }
}
