//! HTTP handler definitions for the calculation server.
//!
//! Defines `AppState` (the shared state carried through axum extractors) and
//! re-exports the handlers for router assembly.

pub mod health;
pub mod process;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use process::process_handler;

use std::sync::Arc;
use std::time::Instant;

use super::{NetworkConfig, ShutdownController};
use crate::service::TaskScheduler;

/// Shared application state passed to all axum handlers via `State` extraction.
#[derive(Clone)]
pub struct AppState {
    /// Spawns task units for accepted requests.
    pub scheduler: TaskScheduler,
    /// Health state and running-task tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Network configuration, including the inbound token.
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
