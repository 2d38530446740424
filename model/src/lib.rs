//! Fundamental types for the Meridian protocol.
//!
//! This crate defines the entities shared across every other crate in the
//! workspace: identifiers, blocks and headers, quorum certificates, execution
//! results and seals, node identities, and the public output of the
//! distributed key generation ceremony.

pub mod block;
pub mod bootstrap;
pub mod collection;
pub mod consensus;
pub mod dkg;
pub mod identifier;
pub mod identity;
pub mod keys;
pub mod result;

pub use block::{Block, Header, Payload};
pub use collection::{Collection, CollectionGuarantee, Transaction};
pub use consensus::QuorumCertificate;
pub use dkg::{DkgParticipant, DkgPublicData};
pub use identifier::{ChainId, Identifier};
pub use identity::{Identity, Role};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use result::{ExecutionResult, Seal, StateCommitment};
