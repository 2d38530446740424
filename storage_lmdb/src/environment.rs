//! Shared LMDB environment and database handles.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn, RwTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use meridian_model::{ExecutionResult, Identifier};

use crate::write_batch::WriteBatch;
use crate::LmdbError;

pub(crate) const DB_HEADERS: &str = "headers";
pub(crate) const DB_IDENTITIES: &str = "identities";
pub(crate) const DB_GUARANTEES: &str = "guarantees";
pub(crate) const DB_SEALS: &str = "seals";
pub(crate) const DB_INDEX: &str = "index";
pub(crate) const DB_TRANSACTIONS: &str = "transactions";
pub(crate) const DB_COLLECTIONS: &str = "collections";
pub(crate) const DB_RESULTS: &str = "results";
pub(crate) const DB_META: &str = "meta";

/// Wraps the LMDB environment and the named databases every collaborator
/// shares. Opened exactly once per process; handed around by `Arc`.
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    pub(crate) headers: Database<Bytes, Bytes>,
    pub(crate) identities: Database<Bytes, Bytes>,
    pub(crate) guarantees: Database<Bytes, Bytes>,
    pub(crate) seals: Database<Bytes, Bytes>,
    pub(crate) index: Database<Bytes, Bytes>,
    pub(crate) transactions: Database<Bytes, Bytes>,
    pub(crate) collections: Database<Bytes, Bytes>,
    pub(crate) results: Database<Bytes, Bytes>,
    pub(crate) meta: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`.
    ///
    /// The directory is pre-created (LMDB only creates single-level paths
    /// itself). All named databases are created up front so later opens can
    /// run inside read transactions.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let headers = env.create_database(&mut wtxn, Some(DB_HEADERS))?;
        let identities = env.create_database(&mut wtxn, Some(DB_IDENTITIES))?;
        let guarantees = env.create_database(&mut wtxn, Some(DB_GUARANTEES))?;
        let seals = env.create_database(&mut wtxn, Some(DB_SEALS))?;
        let index = env.create_database(&mut wtxn, Some(DB_INDEX))?;
        let transactions = env.create_database(&mut wtxn, Some(DB_TRANSACTIONS))?;
        let collections = env.create_database(&mut wtxn, Some(DB_COLLECTIONS))?;
        let results = env.create_database(&mut wtxn, Some(DB_RESULTS))?;
        let meta = env.create_database(&mut wtxn, Some(DB_META))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "LMDB environment opened");

        Ok(Self {
            env,
            headers,
            identities,
            guarantees,
            seals,
            index,
            transactions,
            collections,
            results,
            meta,
        })
    }

    /// Begin a write batch spanning all databases. Commits atomically.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, LmdbError> {
        WriteBatch::begin(self)
    }

    // ── Metadata (head pointer, chain bookkeeping) ──────────────────────

    /// Read a metadata value, `None` when unset.
    pub fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Ok(self.meta.get(&rtxn, key.as_bytes())?.map(<[u8]>::to_vec))
    }

    /// Write a single metadata value in its own transaction.
    pub fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        self.meta.put(&mut wtxn, key.as_bytes(), value)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Read a persisted execution result by its identifier.
    pub fn get_result(&self, result_id: &Identifier) -> Result<ExecutionResult, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let raw = self
            .results
            .get(&rtxn, result_id.as_bytes())?
            .ok_or_else(|| LmdbError::NotFound(format!("execution result {result_id}")))?;
        decode(raw)
    }

    // ── Shared helpers for the collaborators ────────────────────────────

    pub(crate) fn get_entity<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        what: impl FnOnce() -> String,
    ) -> Result<T, LmdbError> {
        let rtxn: RoTxn<'_> = self.env.read_txn()?;
        let raw = db.get(&rtxn, key)?.ok_or_else(|| LmdbError::NotFound(what()))?;
        decode(raw)
    }

    pub(crate) fn put_entity<T: Serialize>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        entity: &T,
    ) -> Result<(), LmdbError> {
        let bytes = encode(entity)?;
        let mut wtxn: RwTxn<'_> = self.env.write_txn()?;
        db.put(&mut wtxn, key, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }

    pub(crate) fn exists(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<bool, LmdbError> {
        let rtxn = self.env.read_txn()?;
        Ok(db.get(&rtxn, key)?.is_some())
    }
}

pub(crate) fn encode<T: Serialize>(entity: &T) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(entity).map_err(|e| LmdbError::Encoding(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, LmdbError> {
    bincode::deserialize(raw).map_err(|e| LmdbError::Encoding(e.to_string()))
}
