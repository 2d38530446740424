use thiserror::Error;

use meridian_state::StateError;
use meridian_storage::StoreError;
use meridian_storage_lmdb::LmdbError;

/// Exit code used when an abort signal cuts a startup or shutdown wait
/// short. Distinguishes an interrupted process from a graceful stop (0) and
/// from a fatal error (1).
pub const ABORT_EXIT_CODE: i32 = 130;

/// Every error at this layer is terminal: a consensus-participating node has
/// no degraded mode, so there is no retry or partial-success path here.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("identity error: {0}")]
    Identity(String),

    #[error("could not load {artifact}: {reason}")]
    BootstrapArtifact { artifact: String, reason: String },

    #[error("configured {key} key does not match the persisted identity")]
    Consistency { key: &'static str },

    #[error("component {name} failed to initialize: {reason}")]
    ComponentInit { name: String, reason: String },

    #[error("module {name} failed to initialize: {reason}")]
    ModuleInit { name: String, reason: String },

    #[error("bootstrap callback {name} failed: {reason}")]
    BootstrapCallback { name: String, reason: String },

    #[error("component {name} not ready within {timeout_ms} ms")]
    ReadinessTimeout { name: String, timeout_ms: u64 },

    #[error("component {name} not done within {timeout_ms} ms")]
    ShutdownTimeout { name: String, timeout_ms: u64 },

    #[error("aborted by signal during {phase}")]
    Aborted { phase: &'static str },

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("storage backend error: {0}")]
    Backend(#[from] LmdbError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// The process exit code the daemon maps this error to.
    pub fn exit_code(&self) -> i32 {
        match self {
            NodeError::Aborted { .. } => ABORT_EXIT_CODE,
            _ => 1,
        }
    }
}
