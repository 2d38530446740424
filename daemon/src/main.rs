//! Meridian daemon — entry point for running a Meridian node.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use meridian_node::{init_logging, LogFormat, NodeBuilder, NodeConfig};

#[derive(Parser)]
#[command(name = "meridian-daemon", about = "Meridian protocol node daemon")]
struct Cli {
    /// Hex-encoded identifier of this node (required).
    #[arg(long, env = "MERIDIAN_NODE_ID")]
    node_id: Option<String>,

    /// Address to bind protocol services to (defaults to the address in
    /// this node's persisted identity).
    #[arg(long, env = "MERIDIAN_BIND_ADDR")]
    bind_addr: Option<String>,

    /// Directory holding genesis artifacts and private node info.
    #[arg(long, env = "MERIDIAN_BOOTSTRAP_DIR")]
    bootstrap_dir: Option<PathBuf>,

    /// Bound on each component readiness/done wait, in milliseconds.
    #[arg(long, env = "MERIDIAN_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Data directory for ledger storage.
    #[arg(long, env = "MERIDIAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "MERIDIAN_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "MERIDIAN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Port for the Prometheus /metrics endpoint.
    #[arg(long, env = "MERIDIAN_METRICS_PORT")]
    metrics_port: Option<u16>,

    /// Number of collection clusters.
    #[arg(long, env = "MERIDIAN_CLUSTER_COUNT")]
    cluster_count: Option<u32>,

    /// Enable the periodic process profiler.
    #[arg(long, env = "MERIDIAN_PROFILER")]
    profiler: bool,

    /// Directory profiler snapshots are written to.
    #[arg(long, env = "MERIDIAN_PROFILER_DIR")]
    profiler_dir: Option<PathBuf>,

    /// Seconds between profiler samples.
    #[arg(long, env = "MERIDIAN_PROFILER_INTERVAL")]
    profiler_interval: Option<u64>,

    /// Duration of each profiler sample, in seconds.
    #[arg(long, env = "MERIDIAN_PROFILER_DURATION")]
    profiler_duration: Option<u64>,

    /// Path to a TOML configuration file. File settings are the base; CLI
    /// flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer CLI/env values over the config file (or defaults).
    fn into_config(self) -> anyhow::Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => NodeConfig::from_toml_file(path)?,
            None => NodeConfig::default(),
        };

        if let Some(node_id) = self.node_id {
            config.node_id = node_id;
        }
        if self.bind_addr.is_some() {
            config.bind_addr = self.bind_addr;
        }
        if let Some(dir) = self.bootstrap_dir {
            config.bootstrap_dir = dir;
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout_ms = ms;
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        if let Some(count) = self.cluster_count {
            config.cluster_count = count;
        }
        if self.profiler {
            config.profiler.enabled = true;
        }
        if let Some(dir) = self.profiler_dir {
            config.profiler.dir = dir;
        }
        if let Some(secs) = self.profiler_interval {
            config.profiler.interval_secs = secs;
        }
        if let Some(secs) = self.profiler_duration {
            config.profiler.duration_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(
        LogFormat::from_config(&config.log_format),
        &config.log_level,
    );

    tracing::info!(
        node_id = %config.node_id,
        data_dir = %config.data_dir.display(),
        bootstrap_dir = %config.bootstrap_dir.display(),
        "starting Meridian node"
    );

    let builder = NodeBuilder::new(config).with_default_components();
    match builder.run().await {
        Ok(()) => {
            tracing::info!("Meridian daemon exited cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e.exit_code();
            tracing::error!(error = %e, exit_code = code, "node terminated");
            ExitCode::from(code as u8)
        }
    }
}
