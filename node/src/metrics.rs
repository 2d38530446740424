//! Prometheus metrics for the node lifecycle.
//!
//! [`NodeMetrics`] owns a dedicated [`Registry`] covering the supervisor's
//! own activity: modules initialized, components started and stopped, which
//! state path was taken, and how long startup took. [`MetricsServer`] is the
//! managed component that serves the registry at `/metrics`.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Histogram, HistogramOpts, IntCounter, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::component::{Component, Signal, Signals};

/// Central collection of node-level Prometheus metrics.
pub struct NodeMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    /// Total modules initialized by the supervisor.
    pub modules_initialized: IntCounter,
    /// Total components whose readiness wait succeeded.
    pub components_started: IntCounter,
    /// Total components whose done wait succeeded during teardown.
    pub components_stopped: IntCounter,
    /// 1 when this process took the genesis bootstrap path, 0 on resume.
    pub bootstrap_path: IntGauge,
    /// Components currently running.
    pub components_running: IntGauge,
    /// Wall-clock seconds from run() entry to all components ready.
    pub startup_seconds: Histogram,
}

impl NodeMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let modules_initialized = register_int_counter_with_registry!(
            Opts::new(
                "meridian_modules_initialized_total",
                "Total modules initialized"
            ),
            registry
        )
        .expect("failed to register modules_initialized counter");

        let components_started = register_int_counter_with_registry!(
            Opts::new(
                "meridian_components_started_total",
                "Total components started successfully"
            ),
            registry
        )
        .expect("failed to register components_started counter");

        let components_stopped = register_int_counter_with_registry!(
            Opts::new(
                "meridian_components_stopped_total",
                "Total components stopped cleanly"
            ),
            registry
        )
        .expect("failed to register components_stopped counter");

        let bootstrap_path = register_int_gauge_with_registry!(
            Opts::new(
                "meridian_bootstrap_path",
                "1 when this process bootstrapped genesis, 0 on resume"
            ),
            registry
        )
        .expect("failed to register bootstrap_path gauge");

        let components_running = register_int_gauge_with_registry!(
            Opts::new(
                "meridian_components_running",
                "Components currently running"
            ),
            registry
        )
        .expect("failed to register components_running gauge");

        let startup_seconds = register_histogram_with_registry!(
            HistogramOpts::new(
                "meridian_startup_seconds",
                "Seconds from run() entry to all components ready"
            )
            .buckets(prometheus::exponential_buckets(0.01, 2.0, 12).unwrap()),
            registry
        )
        .expect("failed to register startup_seconds histogram");

        Self {
            registry,
            modules_initialized,
            components_started,
            components_stopped,
            bootstrap_path,
            components_running,
            startup_seconds,
        }
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode_utf8(&self.registry.gather(), &mut out) {
            tracing::warn!(error = %e, "failed to encode metrics");
        }
        out
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Managed component serving `/metrics` over HTTP.
///
/// Fires `ready` once the listener is bound; a bind failure leaves `ready`
/// unfired so the supervisor's readiness timeout reports it.
pub struct MetricsServer {
    signals: Signals,
    stop: Signal,
}

impl MetricsServer {
    pub fn start(metrics: Arc<NodeMetrics>, port: u16) -> Arc<Self> {
        let server = Arc::new(Self {
            signals: Signals::new(),
            stop: Signal::new(),
        });

        let handle = Arc::clone(&server);
        tokio::spawn(async move {
            let app = Router::new().route(
                "/metrics",
                get(move || {
                    let metrics = Arc::clone(&metrics);
                    async move { metrics.render() }
                }),
            );

            match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
                Ok(listener) => {
                    tracing::info!(port, "metrics server listening");
                    handle.signals.ready.fire();
                    let stop = handle.stop.clone();
                    let serve = axum::serve(listener, app)
                        .with_graceful_shutdown(async move { stop.fired().await });
                    if let Err(e) = serve.await {
                        tracing::error!(error = %e, "metrics server failed");
                    }
                }
                Err(e) => {
                    tracing::error!(port, error = %e, "metrics server could not bind");
                }
            }
            handle.signals.done.fire();
        });

        server
    }
}

impl Component for MetricsServer {
    fn ready(&self) -> Signal {
        self.signals.ready.clone()
    }

    fn done(&self) -> Signal {
        self.signals.done.clone()
    }

    fn stop(&self) {
        self.stop.fire();
    }
}
