//! The readiness capability managed components expose to the supervisor.
//!
//! A component is anything with a start/stop lifecycle the supervisor gates
//! on: it observes the component through exactly two one-shot signals. The
//! `ready` signal fires once the component is serving; the `done` signal
//! fires once it has finished shutting down after [`Component::stop`] was
//! requested. Both are level-triggered: once fired they stay observably
//! fired for the rest of the process.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// A one-shot, level-triggered observation point.
///
/// Cloning yields another handle to the same underlying signal. [`fire`]
/// is idempotent; [`fired`] resolves immediately once the signal has fired,
/// no matter how many observers wait on it or when they start waiting.
///
/// [`fire`]: Signal::fire
/// [`fired`]: Signal::fired
#[derive(Clone, Default)]
pub struct Signal {
    token: CancellationToken,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire(&self) {
        self.token.cancel();
    }

    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn fired(&self) {
        self.token.cancelled().await;
    }
}

/// The ready/done pair a concrete component owns.
#[derive(Clone, Default)]
pub struct Signals {
    pub ready: Signal,
    pub done: Signal,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A managed subsystem with a readiness-gated lifecycle.
///
/// The supervisor holds started components uniformly as
/// `Arc<dyn Component>` tagged with their registration name; it never
/// inspects the concrete type.
pub trait Component: Send + Sync {
    /// Observation point that fires once the component is serving.
    fn ready(&self) -> Signal;

    /// Observation point that fires once shutdown has completed.
    fn done(&self) -> Signal;

    /// Request shutdown. Must be safe to call more than once; completion is
    /// observed through [`Component::done`], never through this call.
    fn stop(&self);
}

/// A started component together with the name it was registered under.
/// Names attribute failures in logs; they are not unique keys.
pub struct StartedComponent {
    pub component: Arc<dyn Component>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signal_is_level_triggered() {
        let signal = Signal::new();
        assert!(!signal.is_fired());

        signal.fire();
        assert!(signal.is_fired());

        // A waiter that starts after the fire still observes it.
        signal.fired().await;
        signal.fired().await;
    }

    #[tokio::test]
    async fn fire_is_idempotent() {
        let signal = Signal::new();
        signal.fire();
        signal.fire();
        assert!(signal.is_fired());
    }

    #[tokio::test]
    async fn clones_share_the_signal() {
        let signal = Signal::new();
        let observer = signal.clone();
        signal.fire();
        assert!(observer.is_fired());
        observer.fired().await;
    }
}
