//! Tracing setup for the Meridian node.
//!
//! Every deployment picks one of two output formats: human-readable lines
//! for local work, or newline-delimited JSON when the logs feed an
//! aggregation pipeline. `RUST_LOG` takes precedence over the configured
//! level, so a single run can be turned up to
//! `debug,meridian_node=trace` without touching the config file.
//!
//! Supervisor events are attributed to a node by entering [`node_span`]
//! around the run; multi-node test harnesses rely on that field to tell
//! interleaved output apart.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Selects the output format for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Pretty-printed, coloured output for local development.
    Human,
    /// Newline-delimited JSON for production and log aggregation pipelines.
    Json,
}

impl LogFormat {
    /// Parse the config-file representation; anything other than "json"
    /// falls back to human-readable output.
    pub fn from_config(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Human
        }
    }
}

/// Span carrying the node identifier, entered for the whole supervised
/// run. Takes the configured string rather than a parsed [`Identifier`]
/// so it can be opened before validation.
///
/// [`Identifier`]: meridian_model::Identifier
pub fn node_span(node_id: &str) -> tracing::Span {
    tracing::info_span!("node", node_id = %node_id)
}

/// Initialise the global tracing subscriber.
///
/// # Panics
///
/// Panics if a global subscriber has already been set (i.e. this function
/// was called twice in the same process).
pub fn init_logging(format: LogFormat, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    let events = fmt::layer().with_target(true).with_thread_ids(true);
    match format {
        LogFormat::Human => registry.with(events).init(),
        LogFormat::Json => registry.with(events.json()).init(),
    }
}
