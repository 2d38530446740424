//! Collection storage trait.

use meridian_model::{Collection, Identifier};

use crate::StoreError;

/// Storage for collections, keyed by collection identifier. Implementations
/// compose with the transaction store so a collection's transactions can be
/// resolved.
pub trait CollectionStore: Send + Sync {
    fn put(&self, collection: &Collection) -> Result<(), StoreError>;

    fn by_id(&self, collection_id: &Identifier) -> Result<Collection, StoreError>;
}
