//! LMDB storage backend for the Meridian protocol.
//!
//! Implements the `meridian-storage` traits using the `heed` LMDB bindings.
//! Every collaborator shares one [`LmdbEnvironment`]; each logical store maps
//! to a named LMDB database inside it. Values are bincode-encoded.

pub mod blocks;
pub mod collections;
pub mod environment;
pub mod error;
pub mod guarantees;
pub mod headers;
pub mod identities;
pub mod index;
pub mod payloads;
pub mod seals;
pub mod transactions;
pub mod write_batch;

pub use blocks::LmdbBlocks;
pub use collections::LmdbCollections;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use guarantees::LmdbGuarantees;
pub use headers::LmdbHeaders;
pub use identities::LmdbIdentities;
pub use index::LmdbIndex;
pub use payloads::LmdbPayloads;
pub use seals::LmdbSeals;
pub use transactions::LmdbTransactions;
pub use write_batch::WriteBatch;
