//! Block storage trait.

use meridian_model::{Block, Identifier};

use crate::StoreError;

/// Composite storage for full blocks (header + payload).
pub trait BlockStore: Send + Sync {
    fn put(&self, block: &Block) -> Result<(), StoreError>;

    fn by_id(&self, block_id: &Identifier) -> Result<Block, StoreError>;
}
