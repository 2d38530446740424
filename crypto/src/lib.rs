//! Cryptographic primitives for the Meridian protocol.
//!
//! Ed25519 for node staking and networking keys, Blake2b-256 for entity
//! hashing (via `meridian_model::Identifier`).

pub mod keys;
pub mod sign;

pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
