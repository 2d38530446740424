//! Execution results and block seals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifier::Identifier;

/// A commitment to the execution state after a block.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateCommitment(pub [u8; 32]);

impl StateCommitment {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for StateCommitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateCommitment({})", hex::encode(&self.0[..4]))
    }
}

/// The result of executing a block: the state commitment it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub block_id: Identifier,
    pub previous_result_id: Identifier,
    pub final_state: StateCommitment,
}

impl ExecutionResult {
    pub fn id(&self) -> Identifier {
        Identifier::of(self)
    }
}

/// A seal attesting that a block's execution result has been verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seal {
    pub block_id: Identifier,
    pub result_id: Identifier,
    pub final_state: StateCommitment,
}

impl Seal {
    pub fn id(&self) -> Identifier {
        Identifier::of(self)
    }
}
