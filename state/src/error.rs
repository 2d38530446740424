use thiserror::Error;

use meridian_storage::StoreError;
use meridian_storage_lmdb::LmdbError;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state already bootstrapped: head is at height {height}")]
    AlreadyBootstrapped { height: u64 },

    #[error("state not bootstrapped: no finalized head")]
    NotBootstrapped,

    #[error("invalid root block: {reason}")]
    InvalidRoot { reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("backend error: {0}")]
    Backend(#[from] LmdbError),
}

impl StateError {
    pub fn invalid_root(reason: impl Into<String>) -> Self {
        StateError::InvalidRoot {
            reason: reason.into(),
        }
    }
}
