//! `POST /process` -- accept a calculation request and schedule it.
//!
//! The handler checks the shared-secret header, decodes and validates the
//! body, spawns a task unit, and answers `202 Accepted` without waiting for
//! the unit. Rejections never create a unit.

use asynccalc_core::CalculationRequest;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::Json;
use bytes::Bytes;
use serde_json::json;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use super::AppState;
use crate::error::ProcessError;
use crate::ASYNC_TOKEN_HEADER;

pub async fn process_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), ProcessError> {
    authorize(&headers, &state.config.service_token)?;

    if !state.shutdown.health_state().accepts_requests() {
        return Err(ProcessError::ShuttingDown);
    }

    let request: CalculationRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "rejecting undecodable request body");
        ProcessError::BadRequest
    })?;
    request.validate()?;

    info!(
        calculation_id = request.calculation_id,
        services = request.services.len(),
        "calculation accepted"
    );
    state.scheduler.schedule(request);

    Ok((StatusCode::ACCEPTED, Json(json!({ "message": "scheduled" }))))
}

/// Rejects a missing, empty, or mismatched token. Comparison is constant-time.
fn authorize(headers: &HeaderMap, expected: &str) -> Result<(), ProcessError> {
    let provided = headers
        .get(ASYNC_TOKEN_HEADER)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default();

    if provided.is_empty() || !bool::from(provided.ct_eq(expected.as_bytes())) {
        return Err(ProcessError::Unauthorized);
    }
    Ok(())
}
