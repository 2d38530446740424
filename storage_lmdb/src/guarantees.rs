//! LMDB implementation of `GuaranteeStore`.

use std::sync::Arc;

use meridian_model::{CollectionGuarantee, Identifier};
use meridian_storage::{GuaranteeStore, StoreError};

use crate::LmdbEnvironment;

pub struct LmdbGuarantees {
    env: Arc<LmdbEnvironment>,
}

impl LmdbGuarantees {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

impl GuaranteeStore for LmdbGuarantees {
    fn put(&self, guarantee: &CollectionGuarantee) -> Result<(), StoreError> {
        self.env
            .put_entity(
                self.env.guarantees,
                guarantee.collection_id.as_bytes(),
                guarantee,
            )
            .map_err(StoreError::from)
    }

    fn by_collection_id(
        &self,
        collection_id: &Identifier,
    ) -> Result<CollectionGuarantee, StoreError> {
        self.env
            .get_entity(self.env.guarantees, collection_id.as_bytes(), || {
                format!("guarantee for collection {collection_id}")
            })
            .map_err(StoreError::from)
    }
}
