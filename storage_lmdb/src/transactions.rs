//! LMDB implementation of `TransactionStore`.

use std::sync::Arc;

use meridian_model::{Identifier, Transaction};
use meridian_storage::{StoreError, TransactionStore};

use crate::LmdbEnvironment;

pub struct LmdbTransactions {
    env: Arc<LmdbEnvironment>,
}

impl LmdbTransactions {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

impl TransactionStore for LmdbTransactions {
    fn put(&self, transaction: &Transaction) -> Result<(), StoreError> {
        self.env
            .put_entity(self.env.transactions, transaction.id().as_bytes(), transaction)
            .map_err(StoreError::from)
    }

    fn by_id(&self, tx_id: &Identifier) -> Result<Transaction, StoreError> {
        self.env
            .get_entity(self.env.transactions, tx_id.as_bytes(), || {
                format!("transaction {tx_id}")
            })
            .map_err(StoreError::from)
    }
}
