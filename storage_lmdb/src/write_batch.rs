//! Multi-database atomic write batches.
//!
//! A [`WriteBatch`] holds one LMDB write transaction spanning every named
//! database in the environment. The genesis commit uses this so the root
//! block, identity table, seal, result, index, and head pointer land in a
//! single fsync or not at all.

use heed::RwTxn;

use meridian_model::{
    CollectionGuarantee, ExecutionResult, Header, Identifier, Identity, Seal,
};
use meridian_storage::PayloadIndex;

use crate::environment::{encode, LmdbEnvironment};
use crate::LmdbError;

/// An open write transaction across all databases. Nothing is visible to
/// readers until [`commit`](WriteBatch::commit) succeeds; dropping the batch
/// aborts it.
pub struct WriteBatch<'e> {
    env: &'e LmdbEnvironment,
    txn: RwTxn<'e>,
}

impl<'e> WriteBatch<'e> {
    pub(crate) fn begin(env: &'e LmdbEnvironment) -> Result<Self, LmdbError> {
        let txn = env.env.write_txn()?;
        Ok(Self { env, txn })
    }

    pub fn put_header(&mut self, header: &Header) -> Result<(), LmdbError> {
        let bytes = encode(header)?;
        self.env
            .headers
            .put(&mut self.txn, header.id().as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn put_identity(&mut self, identity: &Identity) -> Result<(), LmdbError> {
        let bytes = encode(identity)?;
        self.env
            .identities
            .put(&mut self.txn, identity.node_id.as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn put_guarantee(&mut self, guarantee: &CollectionGuarantee) -> Result<(), LmdbError> {
        let bytes = encode(guarantee)?;
        self.env
            .guarantees
            .put(&mut self.txn, guarantee.collection_id.as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn put_seal(&mut self, seal: &Seal) -> Result<(), LmdbError> {
        let bytes = encode(seal)?;
        self.env
            .seals
            .put(&mut self.txn, seal.id().as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn put_result(&mut self, result: &ExecutionResult) -> Result<(), LmdbError> {
        let bytes = encode(result)?;
        self.env
            .results
            .put(&mut self.txn, result.id().as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn put_index(
        &mut self,
        block_id: &Identifier,
        index: &PayloadIndex,
    ) -> Result<(), LmdbError> {
        let bytes = encode(index)?;
        self.env
            .index
            .put(&mut self.txn, block_id.as_bytes(), &bytes)?;
        Ok(())
    }

    pub fn put_meta(&mut self, key: &str, value: &[u8]) -> Result<(), LmdbError> {
        self.env.meta.put(&mut self.txn, key.as_bytes(), value)?;
        Ok(())
    }

    /// Commit the batch. Consumes the batch; on error nothing was written.
    pub fn commit(self) -> Result<(), LmdbError> {
        self.txn.commit()?;
        Ok(())
    }
}
