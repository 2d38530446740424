//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use meridian_model::Identifier;

use crate::NodeError;

/// Configuration for a Meridian node.
///
/// Bound once at process start and immutable thereafter. Can be loaded from
/// a TOML file via [`NodeConfig::from_toml_file`] or built programmatically
/// (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Hex-encoded identifier of this node. Required; there is no default.
    #[serde(default)]
    pub node_id: String,

    /// Address to bind protocol services to. When unset, the address
    /// recorded in this node's persisted identity is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<String>,

    /// Directory holding the genesis artifacts and per-node private
    /// identity files.
    #[serde(default = "default_bootstrap_dir")]
    pub bootstrap_dir: PathBuf,

    /// Bound on every per-component readiness and done wait, in
    /// milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Data directory for the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Port the Prometheus /metrics endpoint listens on.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,

    /// Number of collection clusters in the network.
    #[serde(default = "default_cluster_count")]
    pub cluster_count: u32,

    /// Periodic process profiler (disabled by default).
    #[serde(default)]
    pub profiler: ProfilerConfig,
}

/// Settings for the interval-driven process profiler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfilerConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Directory snapshots are written to.
    #[serde(default = "default_profiler_dir")]
    pub dir: PathBuf,

    /// Seconds between snapshots.
    #[serde(default = "default_profiler_interval")]
    pub interval_secs: u64,

    /// Seconds of activity each snapshot covers.
    #[serde(default = "default_profiler_duration")]
    pub duration_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bootstrap_dir() -> PathBuf {
    PathBuf::from("bootstrap")
}

fn default_timeout_ms() -> u64 {
    60_000
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".meridian").join("data"),
        None => PathBuf::from("./meridian_data"),
    }
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_metrics_port() -> u16 {
    8080
}

fn default_cluster_count() -> u32 {
    2
}

fn default_profiler_dir() -> PathBuf {
    PathBuf::from("profiles")
}

fn default_profiler_interval() -> u64 {
    900
}

fn default_profiler_duration() -> u64 {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }

    /// Parse and validate the configured node identifier.
    pub fn node_id(&self) -> Result<Identifier, NodeError> {
        if self.node_id.is_empty() {
            return Err(NodeError::Config("node identifier is required".into()));
        }
        self.node_id
            .parse()
            .map_err(|e| NodeError::Config(format!("invalid node identifier: {e}")))
    }

    /// The per-wait bound as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Validate cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.node_id()?;
        if self.timeout_ms == 0 {
            return Err(NodeError::Config("timeout must be positive".into()));
        }
        if self.cluster_count == 0 {
            return Err(NodeError::Config("cluster count must be positive".into()));
        }
        Ok(())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: String::new(),
            bind_addr: None,
            bootstrap_dir: default_bootstrap_dir(),
            timeout_ms: default_timeout_ms(),
            data_dir: default_data_dir(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            metrics_port: default_metrics_port(),
            cluster_count: default_cluster_count(),
            profiler: ProfilerConfig::default(),
        }
    }
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_profiler_dir(),
            interval_secs: default_profiler_interval(),
            duration_secs: default_profiler_duration(),
        }
    }
}
