//! Health, liveness, and readiness endpoint handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use super::AppState;
use crate::network::HealthState;

/// Returns health details as JSON.
///
/// Always 200; the `state` field tells whether the server is ready or draining.
/// `running_tasks` counts task units that have not finished their callback.
pub async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "state": state.shutdown.health_state().as_str(),
        "running_tasks": state.shutdown.running_tasks(),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe -- always 200 OK.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe -- 200 when ready, 503 while starting or draining.
pub async fn readiness_handler(State(state): State<AppState>) -> StatusCode {
    if state.shutdown.health_state() == HealthState::Ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::network::{NetworkConfig, ShutdownController};
    use crate::service::testing::NoopDispatcher;
    use crate::service::{CalculationConfig, FixedRandom, TaskScheduler};

    fn test_state() -> AppState {
        let shutdown = Arc::new(ShutdownController::new());
        let scheduler = TaskScheduler::new(
            CalculationConfig::default(),
            Arc::new(FixedRandom {
                delay: Duration::ZERO,
                success: true,
            }),
            Arc::new(NoopDispatcher),
            Arc::clone(&shutdown),
        );
        AppState {
            scheduler,
            shutdown,
            config: Arc::new(NetworkConfig::default()),
            start_time: Instant::now(),
        }
    }

    #[tokio::test]
    async fn health_handler_reports_ready() {
        let state = test_state();
        state.shutdown.set_ready();

        let json = health_handler(State(state)).await.0;
        assert_eq!(json["state"], "ready");
        assert_eq!(json["running_tasks"], 0);
        assert!(json["uptime_secs"].is_number());
    }

    #[tokio::test]
    async fn health_handler_reports_running_tasks() {
        let state = test_state();
        let _guard = state.shutdown.task_guard();

        let json = health_handler(State(state)).await.0;
        assert_eq!(json["state"], "starting");
        assert_eq!(json["running_tasks"], 1);
    }

    #[tokio::test]
    async fn liveness_handler_always_returns_200() {
        assert_eq!(liveness_handler().await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_health_state() {
        let state = test_state();
        assert_eq!(
            readiness_handler(State(state.clone())).await,
            StatusCode::SERVICE_UNAVAILABLE
        );

        state.shutdown.set_ready();
        assert_eq!(readiness_handler(State(state.clone())).await, StatusCode::OK);

        state.shutdown.trigger_shutdown();
        assert_eq!(
            readiness_handler(State(state)).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
