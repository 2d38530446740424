//! The ordered component registry and the supervisor that executes it.
//!
//! [`NodeBuilder`] accumulates four kinds of deferred work before the node
//! runs: post-init hooks, plain init modules, readiness-capable component
//! factories, and genesis-only bootstrap callbacks. Registration order is
//! preserved exactly; nothing is reordered or deduplicated. `run()`
//! consumes the builder, so registration after startup is a compile error
//! rather than a runtime hazard.
//!
//! Startup is a strict sequential gate: component N+1 never begins until
//! component N's readiness race has resolved, because later components may
//! assume earlier ones are fully live. Teardown walks the successfully
//! started components in exact reverse order. Every wait races the signal
//! against the configured timeout and the abort trigger; all failures at
//! this layer are terminal.

use std::sync::Arc;
use std::time::Instant;

use meridian_model::PublicKey;
use meridian_state::{ProtocolState, StateMutator};
use tracing::Instrument;

use crate::artifacts::{
    load_dkg_public_data, load_root_block, load_root_qc, load_root_result, load_root_seal,
};
use crate::component::{Component, Signal, StartedComponent};
use crate::config::NodeConfig;
use crate::identity::{load_node_identity, verify_key_consistency, Local};
use crate::metrics::{MetricsServer, NodeMetrics};
use crate::node::{Node, RootContext, Storage};
use crate::profiler::AutoProfiler;
use crate::shutdown::ShutdownController;
use crate::NodeError;

pub type ModuleFn = Box<dyn FnOnce(&mut Node) -> Result<(), NodeError> + Send>;
pub type PostInitFn = Box<dyn FnOnce(&mut Node) -> Result<(), NodeError> + Send>;
pub type ComponentFactory =
    Box<dyn FnOnce(&mut Node) -> Result<Arc<dyn Component>, NodeError> + Send>;
pub type BootstrapFn = Box<dyn FnOnce(&StateMutator) -> Result<(), NodeError> + Send>;

/// Ordered registry of everything the node will initialize, start, and
/// supervise. One per process.
pub struct NodeBuilder {
    config: NodeConfig,
    shutdown: ShutdownController,
    post_init: Vec<PostInitFn>,
    modules: Vec<(String, ModuleFn)>,
    components: Vec<(String, ComponentFactory)>,
    bootstrap_callbacks: Vec<(String, BootstrapFn)>,
    root_account_key: Option<PublicKey>,
    root_token_supply: u64,
}

impl NodeBuilder {
    pub fn new(config: NodeConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownController::new(),
            post_init: Vec::new(),
            modules: Vec::new(),
            components: Vec::new(),
            bootstrap_callbacks: Vec::new(),
            root_account_key: None,
            root_token_supply: 0,
        }
    }

    /// A handle for triggering shutdown programmatically (tests, embedding).
    pub fn shutdown_handle(&self) -> ShutdownController {
        self.shutdown.clone()
    }

    /// Register a plain init function. Modules run in registration order,
    /// after post-init hooks and before any component starts.
    pub fn module(
        mut self,
        name: impl Into<String>,
        f: impl FnOnce(&mut Node) -> Result<(), NodeError> + Send + 'static,
    ) -> Self {
        self.modules.push((name.into(), Box::new(f)));
        self
    }

    /// Register a component factory. Factories run in registration order;
    /// each produced component must fire its ready signal before the next
    /// factory is invoked.
    pub fn component(
        mut self,
        name: impl Into<String>,
        f: impl FnOnce(&mut Node) -> Result<Arc<dyn Component>, NodeError> + Send + 'static,
    ) -> Self {
        self.components.push((name.into(), Box::new(f)));
        self
    }

    /// Register a hook that runs before any module, right after the state
    /// is ready.
    pub fn post_init(
        mut self,
        f: impl FnOnce(&mut Node) -> Result<(), NodeError> + Send + 'static,
    ) -> Self {
        self.post_init.push(Box::new(f));
        self
    }

    /// Register a callback that runs against the state mutator on the
    /// genesis path only, exactly once, after the genesis commit.
    pub fn on_bootstrap(
        mut self,
        name: impl Into<String>,
        f: impl FnOnce(&StateMutator) -> Result<(), NodeError> + Send + 'static,
    ) -> Self {
        self.bootstrap_callbacks.push((name.into(), Box::new(f)));
        self
    }

    /// Public key of the root account (execution-role deployments).
    pub fn root_account_key(mut self, key: PublicKey) -> Self {
        self.root_account_key = Some(key);
        self
    }

    /// Initial token supply recorded at genesis.
    pub fn root_token_supply(mut self, supply: u64) -> Self {
        self.root_token_supply = supply;
        self
    }

    /// Register the standard components every deployment runs: the metrics
    /// server, and the auto-profiler when enabled.
    pub fn with_default_components(self) -> Self {
        let metrics_port = self.config.metrics_port;
        let profiler = self.config.profiler.clone();
        let builder = self.component("metrics-server", move |node: &mut Node| {
            Ok(MetricsServer::start(Arc::clone(&node.metrics), metrics_port) as Arc<dyn Component>)
        });
        if profiler.enabled {
            builder.component("auto-profiler", move |_node: &mut Node| {
                Ok(AutoProfiler::start(&profiler) as Arc<dyn Component>)
            })
        } else {
            builder
        }
    }

    /// Run the node to completion: staged init, supervised startup, steady
    /// state until the termination signal, reverse teardown.
    pub async fn run(self) -> Result<(), NodeError> {
        let shutdown = self.shutdown.clone();
        let signal_listener = shutdown.spawn_signal_listener();
        let span = crate::logging::node_span(&self.config.node_id);
        let result = self.run_supervised(&shutdown).instrument(span).await;
        // The OS signal task must not outlive the run, including the
        // early failure paths.
        signal_listener.abort();
        result
    }

    async fn run_supervised(mut self, shutdown: &ShutdownController) -> Result<(), NodeError> {
        let started_at = Instant::now();
        self.config.validate()?;
        let timeout = self.config.timeout();
        let timeout_ms = self.config.timeout_ms;

        // Identity
        let node_id = self.config.node_id()?;
        tracing::info!(%node_id, "loading node identity");
        let keys = load_node_identity(&self.config.bootstrap_dir, &node_id)?;

        // Storage
        let metrics = Arc::new(NodeMetrics::new());
        tracing::info!(data_dir = %self.config.data_dir.display(), "opening storage");
        let storage = Storage::open(&self.config)?;
        let state = Arc::new(ProtocolState::open(Arc::clone(&storage.env)));

        // Protocol state: bootstrap or resume, decided once.
        let head = state.final_head()?;
        let bootstrapped = head.is_none();
        metrics.bootstrap_path.set(i64::from(bootstrapped));
        let root = match head {
            None => self.bootstrap_state(&state)?,
            Some(head) => {
                tracing::info!(height = head.height, "finalized head found, resuming");
                self.resume_state()?
            }
        };

        // Key consistency, before any component starts.
        let persisted = state.identity(&node_id)?;
        verify_key_consistency(&keys, &persisted)?;
        let local = Local::new(persisted, keys);

        let mut node = Node {
            config: self.config.clone(),
            local,
            storage,
            state,
            root,
            bootstrapped,
            metrics: Arc::clone(&metrics),
        };

        // Post-init hooks, then modules, in registration order.
        for hook in self.post_init.drain(..) {
            hook(&mut node)?;
        }
        for (name, f) in self.modules.drain(..) {
            tracing::info!(module = %name, "initializing module");
            f(&mut node).map_err(|e| NodeError::ModuleInit {
                name,
                reason: e.to_string(),
            })?;
            metrics.modules_initialized.inc();
        }

        // Supervised startup. The first OS signal is the abort trigger
        // while a readiness wait is in progress.
        let abort_startup = shutdown.terminate_signal();
        let mut started: Vec<StartedComponent> = Vec::new();
        for (name, factory) in std::mem::take(&mut self.components) {
            tracing::info!(component = %name, "starting component");
            let component = factory(&mut node).map_err(|e| NodeError::ComponentInit {
                name: name.clone(),
                reason: e.to_string(),
            })?;

            let ready = component.ready();
            tokio::select! {
                _ = ready.fired() => {
                    tracing::info!(component = %name, "component ready");
                    metrics.components_started.inc();
                    metrics.components_running.inc();
                    started.push(StartedComponent { component, name });
                }
                _ = tokio::time::sleep(timeout) => {
                    tracing::error!(component = %name, timeout_ms, "component failed to become ready");
                    return Err(NodeError::ReadinessTimeout { name, timeout_ms });
                }
                _ = abort_startup.fired() => {
                    tracing::warn!(component = %name, "startup aborted by signal");
                    return Err(NodeError::Aborted { phase: "startup" });
                }
            }
        }
        metrics
            .startup_seconds
            .observe(started_at.elapsed().as_secs_f64());
        tracing::info!(components = started.len(), "node running");

        // Steady state: block until the termination signal.
        shutdown.terminate_signal().fired().await;
        tracing::info!("stopping components");

        let result = stop_components(&mut started, timeout, timeout_ms, shutdown, &metrics).await;

        // Release storage exactly once, after the walk finished or was
        // abandoned. Close failures are logged, never escalated.
        drop(node);
        tracing::info!("storage released");

        result
    }

    /// Genesis path: load every root artifact, commit atomically, run the
    /// bootstrap callbacks in registration order.
    fn bootstrap_state(&mut self, state: &ProtocolState) -> Result<RootContext, NodeError> {
        tracing::info!(
            bootstrap_dir = %self.config.bootstrap_dir.display(),
            "no finalized head, bootstrapping from genesis artifacts"
        );
        let dir = self.config.bootstrap_dir.clone();
        let block = load_root_block(&dir)?;
        let qc = load_root_qc(&dir)?;
        let result = load_root_result(&dir)?;
        let seal = load_root_seal(&dir)?;
        let chain_id = block.header.chain_id.clone();

        state.bootstrap(&block, &result, &seal)?;

        for (name, callback) in self.bootstrap_callbacks.drain(..) {
            tracing::info!(callback = %name, "running bootstrap callback");
            let mutator = state.mutator(&name);
            callback(&mutator).map_err(|e| NodeError::BootstrapCallback {
                name,
                reason: e.to_string(),
            })?;
        }

        let dkg = Arc::new(meridian_state::DkgState::new(load_dkg_public_data(&dir)?));
        tracing::info!(chain_id = %chain_id, "genesis committed");
        Ok(RootContext {
            block,
            qc,
            result,
            seal,
            chain_id,
            dkg,
            account_key: self.root_account_key.take(),
            token_supply: self.root_token_supply,
        })
    }

    /// Resume path: re-read the root artifacts from disk rather than from
    /// the database. The redundant file I/O on every resume is a behavioral
    /// contract; downstream tooling relies on artifact re-validation here.
    fn resume_state(&mut self) -> Result<RootContext, NodeError> {
        let dir = self.config.bootstrap_dir.clone();
        let block = load_root_block(&dir)?;
        let qc = load_root_qc(&dir)?;
        let result = load_root_result(&dir)?;
        let seal = load_root_seal(&dir)?;
        let chain_id = block.header.chain_id.clone();
        let dkg = Arc::new(meridian_state::DkgState::new(load_dkg_public_data(&dir)?));
        Ok(RootContext {
            block,
            qc,
            result,
            seal,
            chain_id,
            dkg,
            account_key: self.root_account_key.take(),
            token_supply: self.root_token_supply,
        })
    }
}

/// Walk the started components most-recent-first, gating each on its done
/// signal. A second abort signal abandons the walk; components below the
/// current one are left with their done signal unobserved.
async fn stop_components(
    started: &mut Vec<StartedComponent>,
    timeout: std::time::Duration,
    timeout_ms: u64,
    shutdown: &ShutdownController,
    metrics: &NodeMetrics,
) -> Result<(), NodeError> {
    let abort: Signal = shutdown.abort_signal();
    while let Some(StartedComponent { component, name }) = started.pop() {
        component.stop();
        let done = component.done();
        tokio::select! {
            _ = done.fired() => {
                tracing::info!(component = %name, "component stopped");
                metrics.components_stopped.inc();
                metrics.components_running.dec();
            }
            _ = tokio::time::sleep(timeout) => {
                tracing::error!(component = %name, timeout_ms, "component failed to stop");
                return Err(NodeError::ShutdownTimeout { name, timeout_ms });
            }
            _ = abort.fired() => {
                tracing::warn!(component = %name, remaining = started.len() + 1, "teardown abandoned by abort signal");
                return Err(NodeError::Aborted { phase: "shutdown" });
            }
        }
    }
    tracing::info!("all components stopped");
    Ok(())
}
