//! Collection guarantee storage trait.

use meridian_model::{CollectionGuarantee, Identifier};

use crate::StoreError;

/// Storage for collection guarantees, keyed by collection identifier.
pub trait GuaranteeStore: Send + Sync {
    fn put(&self, guarantee: &CollectionGuarantee) -> Result<(), StoreError>;

    fn by_collection_id(&self, collection_id: &Identifier)
        -> Result<CollectionGuarantee, StoreError>;
}
