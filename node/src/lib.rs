//! Meridian node lifecycle supervisor.
//!
//! Brings a node from "nothing initialized" to "all subsystems ready and
//! serving", decides once whether this process originates a new chain
//! (genesis bootstrap) or joins an existing one (resume), and tears the
//! node down cleanly on termination signal or fatal error. Consensus,
//! execution, and networking live behind narrow capability contracts; this
//! crate only assembles and supervises them.

pub mod artifacts;
pub mod builder;
pub mod component;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod profiler;
pub mod shutdown;

pub use artifacts::{
    load_dkg_public_data, load_root_block, load_root_qc, load_root_result, load_root_seal,
};
pub use builder::{BootstrapFn, ComponentFactory, ModuleFn, NodeBuilder, PostInitFn};
pub use component::{Component, Signal, Signals, StartedComponent};
pub use config::{NodeConfig, ProfilerConfig};
pub use error::{NodeError, ABORT_EXIT_CODE};
pub use identity::{load_node_identity, verify_key_consistency, Local, NodeIdentity};
pub use logging::{init_logging, LogFormat};
pub use metrics::{MetricsServer, NodeMetrics};
pub use node::{Node, RootContext, Storage};
pub use profiler::AutoProfiler;
pub use shutdown::ShutdownController;
