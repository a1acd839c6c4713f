//! Network module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections. The shutdown controller exists from `new()`
//! on so the task scheduler can be wired to it before the server starts.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    health_handler, liveness_handler, process_handler, readiness_handler, AppState,
};
use super::middleware::with_http_layers;
use super::shutdown::ShutdownController;
use crate::service::TaskScheduler;

/// Owns the listener and the HTTP server lifecycle.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
}

impl NetworkModule {
    /// Creates a module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// Shared shutdown controller, handed to the task scheduler.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router.
    ///
    /// Routes:
    /// - `POST /process` -- accept a calculation request
    /// - `GET /health` -- health JSON
    /// - `GET /health/live` -- liveness probe
    /// - `GET /health/ready` -- readiness probe
    pub fn build_router(&self, scheduler: TaskScheduler) -> Router {
        router(&self.config, Arc::clone(&self.shutdown), scheduler)
    }

    /// Binds the TCP listener and returns the bound port (which differs from
    /// the configured one when port 0 is used).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = if self.config.host.contains(':') {
            format!("[{}]:{}", self.config.host, self.config.port)
        } else {
            format!("{}:{}", self.config.host, self.config.port)
        };
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves requests until `shutdown` resolves, then waits for running task
    /// units (bounded by `drain_timeout`) before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called or the server hits a
    /// fatal I/O error.
    pub async fn serve(
        self,
        scheduler: TaskScheduler,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let Some(listener) = self.listener else {
            anyhow::bail!("start() must be called before serve()");
        };
        let shutdown_ctrl = self.shutdown;
        let config = self.config;

        let router = router(&config, Arc::clone(&shutdown_ctrl), scheduler);
        shutdown_ctrl.set_ready();

        info!("Serving HTTP connections");
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        shutdown_ctrl.trigger_shutdown();
        let running = shutdown_ctrl.running_tasks();
        if running > 0 {
            info!(running, "waiting for running task units");
        }
        if shutdown_ctrl.wait_for_tasks(config.drain_timeout).await {
            info!("All task units finished");
        } else {
            warn!(
                running = shutdown_ctrl.running_tasks(),
                "Drain timeout expired with task units still running"
            );
        }
        Ok(())
    }
}

fn router(
    config: &NetworkConfig,
    shutdown: Arc<ShutdownController>,
    scheduler: TaskScheduler,
) -> Router {
    let state = AppState {
        scheduler,
        shutdown,
        config: Arc::new(config.clone()),
        start_time: Instant::now(),
    };

    let routes = Router::new()
        .route("/process", post(process_handler))
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler));
    with_http_layers(routes, config).with_state(state)
}
