//! Payload index storage trait.

use meridian_model::Identifier;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// The identifiers making up one block's payload. Stored per block so the
/// payload can be reassembled from the entity stores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadIndex {
    pub identity_ids: Vec<Identifier>,
    pub guarantee_ids: Vec<Identifier>,
    pub seal_ids: Vec<Identifier>,
}

/// Storage for payload indexes, keyed by block identifier.
pub trait IndexStore: Send + Sync {
    fn put(&self, block_id: &Identifier, index: &PayloadIndex) -> Result<(), StoreError>;

    fn by_block_id(&self, block_id: &Identifier) -> Result<PayloadIndex, StoreError>;
}
