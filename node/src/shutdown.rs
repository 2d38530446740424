//! Shutdown signal source for the Meridian node.
//!
//! Listens for SIGINT/SIGTERM and exposes two broadcast, level-triggered
//! signals. The FIRST OS signal fires `terminate`: the run loop's wake-up
//! for a normal reverse teardown, and the abort trigger for any startup
//! wait still in progress. A SECOND OS signal fires `abort`: the trigger
//! that abandons an in-progress teardown. Both stay permanently fired once
//! observed. `terminate()` and `abort()` can also be called
//! programmatically for tests and embedding.

use tokio::signal;
use tokio::task::JoinHandle;

use crate::component::Signal;

/// Coordinates shutdown across the supervisor's wait loops.
#[derive(Clone, Default)]
pub struct ShutdownController {
    terminate: Signal,
    abort: Signal,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The normal-shutdown trigger. Abort trigger during startup waits.
    pub fn terminate_signal(&self) -> Signal {
        self.terminate.clone()
    }

    /// The teardown-abandon trigger, fired by a second OS signal.
    pub fn abort_signal(&self) -> Signal {
        self.abort.clone()
    }

    /// Trigger normal shutdown programmatically.
    pub fn terminate(&self) {
        self.terminate.fire();
    }

    /// Trigger a teardown abort programmatically. Also fires `terminate`
    /// so a single call suffices regardless of the node's current phase.
    pub fn abort(&self) {
        self.terminate.fire();
        self.abort.fire();
    }

    /// Spawn the OS signal listener. First SIGINT/SIGTERM terminates,
    /// second aborts. The task ends after the second signal.
    pub fn spawn_signal_listener(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            #[cfg(unix)]
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");

            for _ in 0..2 {
                #[cfg(unix)]
                {
                    tokio::select! {
                        _ = signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    let _ = signal::ctrl_c().await;
                }

                if !controller.terminate.is_fired() {
                    tracing::info!("termination signal received, shutting down");
                    controller.terminate.fire();
                } else {
                    tracing::warn!("second signal received, aborting shutdown waits");
                    controller.abort.fire();
                }
            }
        })
    }
}
