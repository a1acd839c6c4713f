//! Graceful shutdown controller with running-task tracking.
//!
//! Health state lives in an `ArcSwap` so probes read it without locking.
//! Every scheduled task unit holds a [`TaskGuard`]; shutdown waits for the
//! guard count to reach zero so accepted work still reaches its callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;

/// Server health state.
///
/// State machine: Starting -> Ready -> Draining -> Stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Listener not yet serving.
    Starting,
    /// Accepting calculation requests.
    Ready,
    /// No longer accepting requests; waiting for running tasks.
    Draining,
    /// All running tasks finished.
    Stopped,
}

impl HealthState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }

    /// Whether new calculation requests should be accepted.
    #[must_use]
    pub fn accepts_requests(self) -> bool {
        matches!(self, Self::Starting | Self::Ready)
    }
}

#[derive(Debug)]
pub struct ShutdownController {
    running: Arc<AtomicU64>,
    health_state: ArcSwap<HealthState>,
}

impl ShutdownController {
    /// Creates a controller in the `Starting` state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicU64::new(0)),
            health_state: ArcSwap::from_pointee(HealthState::Starting),
        }
    }

    pub fn set_ready(&self) {
        self.health_state.store(Arc::new(HealthState::Ready));
    }

    /// Moves to `Draining`. New calculation requests are rejected from here on.
    pub fn trigger_shutdown(&self) {
        self.health_state.store(Arc::new(HealthState::Draining));
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.health_state.load()
    }

    /// Registers a running task unit until the returned guard is dropped.
    ///
    /// The count is decremented on drop, including during a panic unwind.
    #[must_use]
    pub fn task_guard(&self) -> TaskGuard {
        self.running.fetch_add(1, Ordering::Relaxed);
        TaskGuard {
            running: Arc::clone(&self.running),
        }
    }

    /// Number of task units that have not yet finished their callback attempt.
    #[must_use]
    pub fn running_tasks(&self) -> u64 {
        self.running.load(Ordering::Relaxed)
    }

    /// Waits until no task units are running, up to `timeout`.
    ///
    /// Returns `true` and moves to `Stopped` if all units finished; returns
    /// `false` and stays `Draining` if the timeout expired first.
    pub async fn wait_for_tasks(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if self.running.load(Ordering::Relaxed) == 0 {
                self.health_state.store(Arc::new(HealthState::Stopped));
                return true;
            }

            if tokio::time::Instant::now() >= deadline {
                return false;
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a task unit counted as running while alive.
#[derive(Debug)]
pub struct TaskGuard {
    running: Arc<AtomicU64>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.running.fetch_sub(1, Ordering::Relaxed);
    }
}
