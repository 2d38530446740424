//! Block seal storage trait.

use meridian_model::{Identifier, Seal};

use crate::StoreError;

/// Storage for block seals, keyed by seal identifier.
pub trait SealStore: Send + Sync {
    fn put(&self, seal: &Seal) -> Result<(), StoreError>;

    fn by_id(&self, seal_id: &Identifier) -> Result<Seal, StoreError>;
}
