//! Abstract storage traits for the Meridian protocol.
//!
//! Each trait describes one storage collaborator the node constructs over a
//! shared key-value handle. Backends live in separate crates
//! (`meridian-storage-lmdb` in this workspace).

pub mod blocks;
pub mod collections;
pub mod error;
pub mod guarantees;
pub mod headers;
pub mod identities;
pub mod index;
pub mod payloads;
pub mod seals;
pub mod transactions;

pub use blocks::BlockStore;
pub use collections::CollectionStore;
pub use error::StoreError;
pub use guarantees::GuaranteeStore;
pub use headers::HeaderStore;
pub use identities::IdentityStore;
pub use index::{IndexStore, PayloadIndex};
pub use payloads::PayloadStore;
pub use seals::SealStore;
pub use transactions::TransactionStore;
