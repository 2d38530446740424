//! LMDB implementation of `CollectionStore`.

use std::sync::Arc;

use meridian_model::{Collection, Identifier, Transaction};
use meridian_storage::{CollectionStore, StoreError, TransactionStore};

use crate::{LmdbEnvironment, LmdbTransactions};

pub struct LmdbCollections {
    env: Arc<LmdbEnvironment>,
    transactions: Arc<LmdbTransactions>,
}

impl LmdbCollections {
    pub fn new(env: Arc<LmdbEnvironment>, transactions: Arc<LmdbTransactions>) -> Self {
        Self { env, transactions }
    }

    /// Resolve the full transactions of a stored collection.
    pub fn transactions_of(
        &self,
        collection_id: &Identifier,
    ) -> Result<Vec<Transaction>, StoreError> {
        let collection = self.by_id(collection_id)?;
        collection
            .transaction_ids
            .iter()
            .map(|tx_id| self.transactions.by_id(tx_id))
            .collect()
    }
}

impl CollectionStore for LmdbCollections {
    fn put(&self, collection: &Collection) -> Result<(), StoreError> {
        self.env
            .put_entity(self.env.collections, collection.id().as_bytes(), collection)
            .map_err(StoreError::from)
    }

    fn by_id(&self, collection_id: &Identifier) -> Result<Collection, StoreError> {
        self.env
            .get_entity(self.env.collections, collection_id.as_bytes(), || {
                format!("collection {collection_id}")
            })
            .map_err(StoreError::from)
    }
}
