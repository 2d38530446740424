//! Node identity storage trait.

use meridian_model::{Identifier, Identity};

use crate::StoreError;

/// Storage for staked node identities, keyed by node identifier.
pub trait IdentityStore: Send + Sync {
    fn put(&self, identity: &Identity) -> Result<(), StoreError>;

    fn by_node_id(&self, node_id: &Identifier) -> Result<Identity, StoreError>;

    /// All identities in the table, in unspecified order.
    fn all(&self) -> Result<Vec<Identity>, StoreError>;
}
