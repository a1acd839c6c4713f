//! HTTP middleware applied to every route of the calculation server.

use axum::http::header::HeaderName;
use axum::http::StatusCode;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::config::NetworkConfig;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps `router` in the server's layers, outermost first:
///
/// 1. `SetRequestId` -- keeps a caller-supplied `X-Request-Id`, otherwise
///    assigns a UUID
/// 2. `Trace` -- one span per request, tagged with the request id
/// 3. `Timeout` -- answers `408` when a handler exceeds `request_timeout`;
///    task units run outside the handler and are not affected
/// 4. `PropagateRequestId` -- echoes `X-Request-Id` on the response
pub fn with_http_layers<S>(router: Router<S>, config: &NetworkConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.request_timeout,
            ))
            .layer(PropagateRequestIdLayer::new(request_id)),
    )
}
