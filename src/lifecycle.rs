//! Coordinated start/stop of the concurrent chat activities.
//!
//! One [`Lifecycle`] governs the whole process.  Its state machine is
//! deliberately small:
//!
//! ```text
//  RUNNING ──interrupt──▶ STOPPING ──all loops joined──▶ STOPPED
//! ```
//!
//! The interrupt path only flips the state; the join/cleanup sequence runs
//! in the main task afterwards, never inside a signal context.  Each loop
//! holds a [`LifecycleHandle`] and races its blocking await against
//! [`LifecycleHandle::stopped`] in `tokio::select!`, so every activity
//! observes the transition at its next suspension point and returns.

use tokio::sync::watch;

/// All possible states of the process lifecycle FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// All activities live; the steady state.
    #[default]
    Running,
    /// Shutdown requested; loops are draining toward their exit.
    Stopping,
    /// Every activity has joined; terminal.
    Stopped,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The single writer of the lifecycle state.
#[derive(Debug)]
pub struct Lifecycle {
    tx: watch::Sender<LifecycleState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LifecycleState::Running);
        Self { tx }
    }

    /// A read-only handle for one activity.
    pub fn handle(&self) -> LifecycleHandle {
        LifecycleHandle {
            rx: self.tx.subscribe(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.tx.borrow()
    }

    /// Request shutdown.  Only the `Running → Stopping` edge exists; a
    /// second interrupt is a no-op.
    pub fn begin_shutdown(&self) {
        self.tx.send_if_modified(|state| {
            if *state == LifecycleState::Running {
                *state = LifecycleState::Stopping;
                true
            } else {
                false
            }
        });
    }

    /// Record that every activity has joined.
    pub fn mark_stopped(&self) {
        self.tx.send_if_modified(|state| {
            if *state == LifecycleState::Stopping {
                *state = LifecycleState::Stopped;
                true
            } else {
                false
            }
        });
    }
}

/// Read side of the lifecycle state, one per activity.
#[derive(Debug, Clone)]
pub struct LifecycleHandle {
    rx: watch::Receiver<LifecycleState>,
}

impl LifecycleHandle {
    pub fn is_running(&self) -> bool {
        *self.rx.borrow() == LifecycleState::Running
    }

    /// Resolve once the state leaves `Running`.
    ///
    /// The watch channel's sender lives in [`Lifecycle`]; if it is dropped
    /// the process is tearing down anyway, so that also counts as stopped.
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|state| *state != LifecycleState::Running).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.state(), LifecycleState::Running);
        assert!(lifecycle.handle().is_running());
    }

    #[test]
    fn shutdown_transitions_once() {
        let lifecycle = Lifecycle::new();
        lifecycle.begin_shutdown();
        assert_eq!(lifecycle.state(), LifecycleState::Stopping);
        // A second interrupt must not move the FSM.
        lifecycle.begin_shutdown();
        assert_eq!(lifecycle.state(), LifecycleState::Stopping);
    }

    #[test]
    fn stopped_only_from_stopping() {
        let lifecycle = Lifecycle::new();
        // Running → Stopped is not a legal edge.
        lifecycle.mark_stopped();
        assert_eq!(lifecycle.state(), LifecycleState::Running);

        lifecycle.begin_shutdown();
        lifecycle.mark_stopped();
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    }

    #[tokio::test]
    async fn handles_observe_shutdown() {
        let lifecycle = Lifecycle::new();
        let mut handle = lifecycle.handle();

        let waiter = tokio::spawn(async move {
            handle.stopped().await;
        });

        lifecycle.begin_shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("handle never observed shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn stopped_resolves_immediately_after_shutdown() {
        let lifecycle = Lifecycle::new();
        lifecycle.begin_shutdown();
        let mut handle = lifecycle.handle();
        assert!(!handle.is_running());
        handle.stopped().await;
    }
}
