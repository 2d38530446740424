//! Block payload storage trait.

use meridian_model::{Identifier, Payload};

use crate::StoreError;

/// Composite storage for block payloads. Implementations decompose a payload
/// into the identity, guarantee, and seal stores plus a per-block index, and
/// reassemble it on read.
pub trait PayloadStore: Send + Sync {
    fn put(&self, block_id: &Identifier, payload: &Payload) -> Result<(), StoreError>;

    fn by_block_id(&self, block_id: &Identifier) -> Result<Payload, StoreError>;
}
