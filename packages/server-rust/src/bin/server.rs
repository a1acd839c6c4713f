//! Async calc server binary.
//!
//! Every option can be given as a flag or through its environment variable.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use asynccalc_server::logging::{init_tracing, LogFormat};
use asynccalc_server::network::parse_listen_addr;
use asynccalc_server::{
    CalculationConfig, CallbackConfig, HttpCallbackDispatcher, NetworkConfig, NetworkModule,
    TaskScheduler, ThreadRandom,
};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to listen on, `host:port` or `:port`.
    #[arg(long, env = "LISTEN_ADDR", default_value = ":8081")]
    listen_addr: String,

    /// Token expected in the `X-ASYNC-TOKEN` header of inbound requests.
    #[arg(long, env = "ASYNC_SERVICE_TOKEN", default_value = "async-secret")]
    service_token: String,

    /// Token sent in the `X-ASYNC-TOKEN` header of outbound callbacks.
    #[arg(long, env = "ASYNC_CALLBACK_TOKEN", default_value = "async-secret")]
    callback_token: String,

    /// Lower bound of the simulated processing delay.
    #[arg(long, env = "ASYNC_MIN_DELAY_MS", default_value_t = 5_000)]
    min_delay_ms: u64,

    /// Upper bound (exclusive) of the simulated processing delay.
    #[arg(long, env = "ASYNC_MAX_DELAY_MS", default_value_t = 10_000)]
    max_delay_ms: u64,

    /// Probability that a calculation reports success.
    #[arg(long, env = "ASYNC_SUCCESS_PROBABILITY", default_value_t = 0.5)]
    success_probability: f64,

    /// Timeout for each callback request.
    #[arg(long, env = "ASYNC_CALLBACK_TIMEOUT_SECS", default_value_t = 10)]
    callback_timeout_secs: u64,

    /// How long shutdown waits for running calculations.
    #[arg(long, env = "ASYNC_DRAIN_TIMEOUT_SECS", default_value_t = 30)]
    drain_timeout_secs: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, "info")?;

    let (host, port) = parse_listen_addr(&cli.listen_addr)
        .with_context(|| format!("invalid listen address: {}", cli.listen_addr))?;

    let calculation = CalculationConfig {
        min_delay: Duration::from_millis(cli.min_delay_ms),
        max_delay: Duration::from_millis(cli.max_delay_ms),
        success_probability: cli.success_probability,
    };
    calculation.validate()?;

    let callback = CallbackConfig {
        token: cli.callback_token,
        timeout: Duration::from_secs(cli.callback_timeout_secs),
    };
    callback.validate()?;

    let network = NetworkConfig {
        host,
        port,
        service_token: cli.service_token,
        drain_timeout: Duration::from_secs(cli.drain_timeout_secs),
        ..NetworkConfig::default()
    };

    let mut module = NetworkModule::new(network);
    let scheduler = TaskScheduler::new(
        calculation,
        Arc::new(ThreadRandom),
        Arc::new(HttpCallbackDispatcher::new(&callback)?),
        module.shutdown_controller(),
    );

    let port = module.start().await?;
    info!(port, "Async calc service listening");

    module.serve(scheduler, shutdown_signal()).await
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
