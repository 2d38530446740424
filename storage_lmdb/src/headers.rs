//! LMDB implementation of `HeaderStore`.

use std::sync::Arc;

use meridian_model::{Header, Identifier};
use meridian_storage::{HeaderStore, StoreError};

use crate::{LmdbEnvironment, LmdbError};

pub struct LmdbHeaders {
    env: Arc<LmdbEnvironment>,
}

impl LmdbHeaders {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

impl HeaderStore for LmdbHeaders {
    fn put(&self, header: &Header) -> Result<(), StoreError> {
        self.env
            .put_entity(self.env.headers, header.id().as_bytes(), header)
            .map_err(StoreError::from)
    }

    fn by_block_id(&self, block_id: &Identifier) -> Result<Header, StoreError> {
        self.env
            .get_entity(self.env.headers, block_id.as_bytes(), || {
                format!("header {block_id}")
            })
            .map_err(StoreError::from)
    }

    fn exists(&self, block_id: &Identifier) -> Result<bool, StoreError> {
        self.env
            .exists(self.env.headers, block_id.as_bytes())
            .map_err(LmdbError::into)
    }
}
