//! LMDB implementation of `PayloadStore`.
//!
//! Payloads are decomposed into the identity, guarantee, and seal databases
//! plus a per-block index, all written in one atomic batch, and reassembled
//! on read.

use std::sync::Arc;

use meridian_model::{Identifier, Payload};
use meridian_storage::{
    GuaranteeStore, IdentityStore, PayloadIndex, PayloadStore, SealStore, StoreError,
};

use crate::{LmdbEnvironment, LmdbGuarantees, LmdbIdentities, LmdbSeals};

pub struct LmdbPayloads {
    env: Arc<LmdbEnvironment>,
    identities: LmdbIdentities,
    guarantees: LmdbGuarantees,
    seals: LmdbSeals,
}

impl LmdbPayloads {
    pub fn new(
        env: Arc<LmdbEnvironment>,
        identities: LmdbIdentities,
        guarantees: LmdbGuarantees,
        seals: LmdbSeals,
    ) -> Self {
        Self {
            env,
            identities,
            guarantees,
            seals,
        }
    }
}

impl PayloadStore for LmdbPayloads {
    fn put(&self, block_id: &Identifier, payload: &Payload) -> Result<(), StoreError> {
        let index = PayloadIndex {
            identity_ids: payload.identities.iter().map(|i| i.node_id).collect(),
            guarantee_ids: payload
                .guarantees
                .iter()
                .map(|g| g.collection_id)
                .collect(),
            seal_ids: payload.seals.iter().map(|s| s.id()).collect(),
        };

        let mut batch = self.env.write_batch()?;
        for identity in &payload.identities {
            batch.put_identity(identity)?;
        }
        for guarantee in &payload.guarantees {
            batch.put_guarantee(guarantee)?;
        }
        for seal in &payload.seals {
            batch.put_seal(seal)?;
        }
        batch.put_index(block_id, &index)?;
        batch.commit()?;
        Ok(())
    }

    fn by_block_id(&self, block_id: &Identifier) -> Result<Payload, StoreError> {
        let index = self
            .env
            .get_entity::<PayloadIndex>(self.env.index, block_id.as_bytes(), || {
                format!("payload index for block {block_id}")
            })?;

        let mut payload = Payload::default();
        for node_id in &index.identity_ids {
            payload.identities.push(self.identities.by_node_id(node_id)?);
        }
        for collection_id in &index.guarantee_ids {
            payload
                .guarantees
                .push(self.guarantees.by_collection_id(collection_id)?);
        }
        for seal_id in &index.seal_ids {
            payload.seals.push(self.seals.by_id(seal_id)?);
        }
        Ok(payload)
    }
}
