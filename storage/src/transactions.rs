//! Transaction storage trait.

use meridian_model::{Identifier, Transaction};

use crate::StoreError;

/// Storage for transactions, keyed by transaction identifier.
pub trait TransactionStore: Send + Sync {
    fn put(&self, transaction: &Transaction) -> Result<(), StoreError>;

    fn by_id(&self, tx_id: &Identifier) -> Result<Transaction, StoreError>;
}
