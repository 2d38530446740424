//! Transactions, collections, and collection guarantees.

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;
use crate::keys::Signature;

/// A user transaction. The supervisor never interprets scripts; it only
/// stores and indexes them on behalf of the execution layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub script: Vec<u8>,
    pub reference_block_id: Identifier,
    pub gas_limit: u64,
}

impl Transaction {
    pub fn id(&self) -> Identifier {
        Identifier::of(self)
    }
}

/// A batch of transactions produced by a collection cluster.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub transaction_ids: Vec<Identifier>,
}

impl Collection {
    pub fn id(&self) -> Identifier {
        Identifier::of(self)
    }
}

/// A collection cluster's attestation that a collection exists and is
/// well-formed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionGuarantee {
    pub collection_id: Identifier,
    pub signer_ids: Vec<Identifier>,
    pub signature: Signature,
}
