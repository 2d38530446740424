//! Interval-driven process profiler.
//!
//! Optional managed component. Every `interval`, it samples process
//! statistics over `duration` and writes a JSON snapshot into the profiler
//! directory. Disabled by default; enabled through
//! [`ProfilerConfig`](crate::config::ProfilerConfig).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::component::{Component, Signal, Signals};
use crate::config::ProfilerConfig;

/// One sampled snapshot of the process.
#[derive(Serialize)]
struct Snapshot {
    timestamp_ms: u128,
    sample_secs: u64,
    resident_pages: Option<u64>,
    threads: Option<u64>,
}

pub struct AutoProfiler {
    signals: Signals,
    stop: Signal,
}

impl AutoProfiler {
    pub fn start(config: &ProfilerConfig) -> Arc<Self> {
        let profiler = Arc::new(Self {
            signals: Signals::new(),
            stop: Signal::new(),
        });

        let handle = Arc::clone(&profiler);
        let dir = config.dir.clone();
        let interval = Duration::from_secs(config.interval_secs.max(1));
        let duration = Duration::from_secs(config.duration_secs);
        tokio::spawn(async move {
            if let Err(e) = std::fs::create_dir_all(&dir) {
                tracing::error!(dir = %dir.display(), error = %e, "profiler directory unavailable");
                handle.signals.done.fire();
                return;
            }
            handle.signals.ready.fire();

            let stop = handle.stop.clone();
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick completes immediately
            loop {
                tokio::select! {
                    _ = stop.fired() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = stop.fired() => break,
                            _ = tokio::time::sleep(duration) => {}
                        }
                        write_snapshot(&dir, duration.as_secs());
                    }
                }
            }
            handle.signals.done.fire();
        });

        profiler
    }
}

fn write_snapshot(dir: &PathBuf, sample_secs: u64) {
    let timestamp_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let snapshot = Snapshot {
        timestamp_ms,
        sample_secs,
        resident_pages: proc_statm_field(1),
        threads: proc_stat_threads(),
    };
    let path = dir.join(format!("profile-{timestamp_ms}.json"));
    match serde_json::to_string_pretty(&snapshot) {
        Ok(body) => {
            if let Err(e) = std::fs::write(&path, body) {
                tracing::warn!(path = %path.display(), error = %e, "failed to write profile snapshot");
            } else {
                tracing::debug!(path = %path.display(), "profile snapshot written");
            }
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode profile snapshot"),
    }
}

#[cfg(target_os = "linux")]
fn proc_statm_field(index: usize) -> Option<u64> {
    let raw = std::fs::read_to_string("/proc/self/statm").ok()?;
    raw.split_whitespace().nth(index)?.parse().ok()
}

#[cfg(not(target_os = "linux"))]
fn proc_statm_field(_index: usize) -> Option<u64> {
    None
}

#[cfg(target_os = "linux")]
fn proc_stat_threads() -> Option<u64> {
    // Thread count is field 18 after the parenthesised comm field.
    let raw = std::fs::read_to_string("/proc/self/stat").ok()?;
    let after_comm = raw.rsplit(')').next()?;
    after_comm.split_whitespace().nth(17)?.parse().ok()
}

#[cfg(not(target_os = "linux"))]
fn proc_stat_threads() -> Option<u64> {
    None
}

impl Component for AutoProfiler {
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
