//! Protocol state for the Meridian node.
//!
//! Sits between the storage backend and the node supervisor: the finalized
//! head pointer, the staked identity table, sealed execution results, and
//! the atomic genesis commit.

pub mod dkg;
pub mod error;
pub mod mutator;
pub mod state;

pub use dkg::DkgState;
pub use error::StateError;
pub use mutator::StateMutator;
pub use state::ProtocolState;
