//! LMDB implementation of `IndexStore`.

use std::sync::Arc;

use meridian_model::Identifier;
use meridian_storage::{IndexStore, PayloadIndex, StoreError};

use crate::LmdbEnvironment;

pub struct LmdbIndex {
    env: Arc<LmdbEnvironment>,
}

impl LmdbIndex {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

impl IndexStore for LmdbIndex {
    fn put(&self, block_id: &Identifier, index: &PayloadIndex) -> Result<(), StoreError> {
        self.env
            .put_entity(self.env.index, block_id.as_bytes(), index)
            .map_err(StoreError::from)
    }

    fn by_block_id(&self, block_id: &Identifier) -> Result<PayloadIndex, StoreError> {
        self.env
            .get_entity(self.env.index, block_id.as_bytes(), || {
                format!("payload index for block {block_id}")
            })
            .map_err(StoreError::from)
    }
}
