//! Block header storage trait.

use meridian_model::{Header, Identifier};

use crate::StoreError;

/// Storage for block headers, keyed by block identifier.
pub trait HeaderStore: Send + Sync {
    /// Store a header under its block identifier.
    fn put(&self, header: &Header) -> Result<(), StoreError>;

    /// Retrieve the header of the block with the given identifier.
    fn by_block_id(&self, block_id: &Identifier) -> Result<Header, StoreError>;

    /// Check whether a header exists.
    fn exists(&self, block_id: &Identifier) -> Result<bool, StoreError>;
}
