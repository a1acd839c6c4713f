//! Callback dispatcher: single best-effort delivery of an outcome.
//!
//! Delivery is at-most-once. Every failure (bad URL, transport error, timeout,
//! HTTP status >= 400) is logged and absorbed; nothing is retried and nothing
//! is reported back to the scheduler beyond a [`DeliveryReport`].

use async_trait::async_trait;
use asynccalc_core::CalculationOutcome;
use http::{HeaderValue, StatusCode};
use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use super::config::CallbackConfig;
use crate::ASYNC_TOKEN_HEADER;

/// What happened to a delivery attempt. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryReport {
    /// The receiver answered with a non-error status.
    Delivered { status: u16 },
    /// The attempt failed; the reason has already been logged.
    Failed,
}

/// Delivers a finished outcome to a caller-supplied URL.
#[async_trait]
pub trait CallbackDispatcher: Send + Sync {
    /// Performs exactly one delivery attempt. Never fails.
    async fn dispatch(&self, url: &str, outcome: &CalculationOutcome) -> DeliveryReport;
}

/// Reasons a callback attempt failed.
#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("callback build error: {0}")]
    Build(#[source] reqwest::Error),
    #[error("callback send error: {0}")]
    Send(#[source] reqwest::Error),
    #[error("callback responded with status {0}")]
    Status(StatusCode),
}

/// `reqwest`-backed dispatcher sharing one connection pool across tasks.
#[derive(Debug, Clone)]
pub struct HttpCallbackDispatcher {
    client: Client,
    token: HeaderValue,
}

impl HttpCallbackDispatcher {
    /// Builds the HTTP client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the
    /// client cannot be constructed.
    pub fn new(config: &CallbackConfig) -> anyhow::Result<Self> {
        let token = HeaderValue::from_str(&config.token)
            .map_err(|e| anyhow::anyhow!("invalid callback token: {e}"))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build callback client: {e}"))?;
        Ok(Self { client, token })
    }

    async fn try_dispatch(
        &self,
        url: &str,
        outcome: &CalculationOutcome,
    ) -> Result<StatusCode, CallbackError> {
        let request = self
            .client
            .post(url)
            .header(ASYNC_TOKEN_HEADER, self.token.clone())
            .json(outcome)
            .build()
            .map_err(CallbackError::Build)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(CallbackError::Send)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(CallbackError::Status(status));
        }
        Ok(status)
    }
}

#[async_trait]
impl CallbackDispatcher for HttpCallbackDispatcher {
    async fn dispatch(&self, url: &str, outcome: &CalculationOutcome) -> DeliveryReport {
        match self.try_dispatch(url, outcome).await {
            Ok(status) => {
                info!(
                    status = status.as_u16(),
                    outcome = outcome.status().as_str(),
                    "callback delivered"
                );
                DeliveryReport::Delivered {
                    status: status.as_u16(),
                }
            }
            Err(err) => {
                warn!(error = %err, "callback delivery failed");
                DeliveryReport::Failed
            }
        }
    }
}
