//! Persistent protocol state.
//!
//! [`ProtocolState`] is the node's view of the finalized chain: the head
//! pointer, the identity table, and the sealed execution state. It is built
//! over one shared [`LmdbEnvironment`]; the genesis commit writes every root
//! entity and the head pointer in a single write batch, so a crash during
//! bootstrapping leaves the database empty rather than half-initialized.

use std::sync::Arc;

use meridian_model::{Block, ExecutionResult, Header, Identifier, Identity, Seal};
use meridian_storage::{HeaderStore, IdentityStore, PayloadIndex, StoreError};
use meridian_storage_lmdb::{LmdbEnvironment, LmdbHeaders, LmdbIdentities};

use crate::error::StateError;
use crate::mutator::StateMutator;

/// Meta key holding the identifier of the finalized head block.
const KEY_HEAD_BLOCK: &str = "head-block-id";
/// Meta key holding the identifier of the root block this state was
/// bootstrapped from.
const KEY_ROOT_BLOCK: &str = "root-block-id";

pub struct ProtocolState {
    env: Arc<LmdbEnvironment>,
    headers: LmdbHeaders,
    identities: LmdbIdentities,
}

impl ProtocolState {
    pub fn open(env: Arc<LmdbEnvironment>) -> Self {
        let headers = LmdbHeaders::new(Arc::clone(&env));
        let identities = LmdbIdentities::new(Arc::clone(&env));
        Self {
            env,
            headers,
            identities,
        }
    }

    /// The finalized head of the chain, or `None` when the database has
    /// never been bootstrapped. This is the decision point between the
    /// genesis path and the resume path.
    pub fn final_head(&self) -> Result<Option<Header>, StateError> {
        let Some(raw) = self.env.get_meta(KEY_HEAD_BLOCK)? else {
            return Ok(None);
        };
        let block_id = decode_id(&raw)?;
        let header = self.headers.by_block_id(&block_id)?;
        Ok(Some(header))
    }

    /// The identifier of the root block, `None` when not bootstrapped.
    pub fn root_block_id(&self) -> Result<Option<Identifier>, StateError> {
        match self.env.get_meta(KEY_ROOT_BLOCK)? {
            Some(raw) => Ok(Some(decode_id(&raw)?)),
            None => Ok(None),
        }
    }

    /// Look up a staked identity from the identity table.
    pub fn identity(&self, node_id: &Identifier) -> Result<Identity, StateError> {
        Ok(self.identities.by_node_id(node_id)?)
    }

    /// The full identity table.
    pub fn identities(&self) -> Result<Vec<Identity>, StateError> {
        Ok(self.identities.all()?)
    }

    /// Look up a stored execution result.
    pub fn result(&self, result_id: &Identifier) -> Result<ExecutionResult, StateError> {
        Ok(self.env.get_result(result_id)?)
    }

    /// A namespaced mutator for auxiliary state owned by one subsystem.
    pub fn mutator(&self, namespace: &str) -> StateMutator {
        StateMutator::new(Arc::clone(&self.env), namespace)
    }

    /// Bootstrap the state from the root block and its sealing artifacts.
    ///
    /// Validates that the artifacts form a consistent genesis, then commits
    /// the root header, the identity table, the root result and seal, the
    /// payload index, and the head pointer atomically. Fails without writing
    /// anything if the state already has a head.
    pub fn bootstrap(
        &self,
        block: &Block,
        result: &ExecutionResult,
        seal: &Seal,
    ) -> Result<(), StateError> {
        if let Some(head) = self.final_head()? {
            return Err(StateError::AlreadyBootstrapped {
                height: head.height,
            });
        }
        validate_root(block, result, seal)?;

        let block_id = block.id();
        let index = PayloadIndex {
            identity_ids: block.payload.identities.iter().map(|i| i.node_id).collect(),
            guarantee_ids: Vec::new(),
            seal_ids: Vec::new(),
        };

        let mut batch = self.env.write_batch()?;
        batch.put_header(&block.header)?;
        for identity in &block.payload.identities {
            batch.put_identity(identity)?;
        }
        batch.put_result(result)?;
        batch.put_seal(seal)?;
        batch.put_index(&block_id, &index)?;
        batch.put_meta(KEY_HEAD_BLOCK, block_id.as_bytes())?;
        batch.put_meta(KEY_ROOT_BLOCK, block_id.as_bytes())?;
        batch.commit()?;

        tracing::info!(
            block_id = %block_id,
            identities = block.payload.identities.len(),
            "protocol state bootstrapped from root block",
        );
        Ok(())
    }
}

/// Check that the root block and its sealing artifacts form a valid genesis.
fn validate_root(block: &Block, result: &ExecutionResult, seal: &Seal) -> Result<(), StateError> {
    if !block.header.parent_id.is_zero() {
        return Err(StateError::invalid_root("root block has a parent"));
    }
    if block.header.height != 0 {
        return Err(StateError::invalid_root(format!(
            "root block height is {}, expected 0",
            block.header.height
        )));
    }
    if block.header.payload_hash != block.payload.hash() {
        return Err(StateError::invalid_root("payload hash mismatch"));
    }
    if block.payload.identities.is_empty() {
        return Err(StateError::invalid_root("identity table is empty"));
    }
    if block.payload.identities.iter().any(|i| i.stake == 0) {
        return Err(StateError::invalid_root("identity with zero stake"));
    }
    if !block.payload.guarantees.is_empty() || !block.payload.seals.is_empty() {
        return Err(StateError::invalid_root(
            "root payload must carry no guarantees or seals",
        ));
    }

    let block_id = block.id();
    if result.block_id != block_id {
        return Err(StateError::invalid_root(
            "root result references a different block",
        ));
    }
    if seal.block_id != block_id {
        return Err(StateError::invalid_root(
            "root seal references a different block",
        ));
    }
    if seal.result_id != result.id() {
        return Err(StateError::invalid_root(
            "root seal references a different result",
        ));
    }
    if seal.final_state != result.final_state {
        return Err(StateError::invalid_root(
            "root seal and result disagree on the final state",
        ));
    }
    Ok(())
}

fn decode_id(raw: &[u8]) -> Result<Identifier, StateError> {
    let bytes: [u8; 32] = raw
        .try_into()
        .map_err(|_| StoreError::Encoding("head pointer is not 32 bytes".into()))?;
    Ok(Identifier::new(bytes))
}
