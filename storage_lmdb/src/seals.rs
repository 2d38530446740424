//! LMDB implementation of `SealStore`.

use std::sync::Arc;

use meridian_model::{Identifier, Seal};
use meridian_storage::{SealStore, StoreError};

use crate::LmdbEnvironment;

pub struct LmdbSeals {
    env: Arc<LmdbEnvironment>,
}

impl LmdbSeals {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

impl SealStore for LmdbSeals {
    fn put(&self, seal: &Seal) -> Result<(), StoreError> {
        self.env
            .put_entity(self.env.seals, seal.id().as_bytes(), seal)
            .map_err(StoreError::from)
    }

    fn by_id(&self, seal_id: &Identifier) -> Result<Seal, StoreError> {
        self.env
            .get_entity(self.env.seals, seal_id.as_bytes(), || {
                format!("seal {seal_id}")
            })
            .map_err(StoreError::from)
    }
}
