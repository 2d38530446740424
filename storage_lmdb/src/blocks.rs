//! LMDB implementation of `BlockStore`, composed over headers and payloads.

use std::sync::Arc;

use meridian_model::{Block, Identifier};
use meridian_storage::{BlockStore, HeaderStore, PayloadStore, StoreError};

use crate::{LmdbHeaders, LmdbPayloads};

pub struct LmdbBlocks {
    headers: Arc<LmdbHeaders>,
    payloads: Arc<LmdbPayloads>,
}

impl LmdbBlocks {
    pub fn new(headers: Arc<LmdbHeaders>, payloads: Arc<LmdbPayloads>) -> Self {
        Self { headers, payloads }
    }
}

impl BlockStore for LmdbBlocks {
    fn put(&self, block: &Block) -> Result<(), StoreError> {
        let block_id = block.id();
        self.headers.put(&block.header)?;
        self.payloads.put(&block_id, &block.payload)?;
        Ok(())
    }

    fn by_id(&self, block_id: &Identifier) -> Result<Block, StoreError> {
        let header = self.headers.by_block_id(block_id)?;
        let payload = self.payloads.by_block_id(block_id)?;
        Ok(Block { header, payload })
    }
}
