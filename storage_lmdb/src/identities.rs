//! LMDB implementation of `IdentityStore`.

use std::sync::Arc;

use meridian_model::{Identifier, Identity};
use meridian_storage::{IdentityStore, StoreError};

use crate::environment::decode;
use crate::{LmdbEnvironment, LmdbError};

pub struct LmdbIdentities {
    env: Arc<LmdbEnvironment>,
}

impl LmdbIdentities {
    pub fn new(env: Arc<LmdbEnvironment>) -> Self {
        Self { env }
    }
}

impl IdentityStore for LmdbIdentities {
    fn put(&self, identity: &Identity) -> Result<(), StoreError> {
        self.env
            .put_entity(self.env.identities, identity.node_id.as_bytes(), identity)
            .map_err(StoreError::from)
    }

    fn by_node_id(&self, node_id: &Identifier) -> Result<Identity, StoreError> {
        self.env
            .get_entity(self.env.identities, node_id.as_bytes(), || {
                format!("identity {node_id}")
            })
            .map_err(StoreError::from)
    }

    fn all(&self) -> Result<Vec<Identity>, StoreError> {
        let rtxn = self.env.env.read_txn().map_err(LmdbError::from)?;
        let mut identities = Vec::new();
        let iter = self.env.identities.iter(&rtxn).map_err(LmdbError::from)?;
        for entry in iter {
            let (_, raw) = entry.map_err(LmdbError::from)?;
            identities.push(decode(raw)?);
        }
        Ok(identities)
    }
}
