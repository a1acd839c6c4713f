//! Async calc core: request/outcome types, duration resolver, and pricing engine.
//!
//! Everything in this crate is synchronous and free of I/O. The server crate
//! owns scheduling, randomness, and callback delivery.

pub mod duration;
pub mod pricing;
pub mod types;

pub use duration::resolve_duration;
pub use pricing::{calculate, DEFAULT_DURATION_MONTHS};
pub use types::{
    CalculationOutcome, CalculationRequest, OutcomeStatus, PriceType, Quote, ServiceItem,
    ValidationError,
};

/// Prices a request end to end: resolves its date range, then runs the engine.
#[must_use]
pub fn quote_request(request: &CalculationRequest) -> Quote {
    let months_override =
        resolve_duration(request.start_date.as_deref(), request.end_date.as_deref());
    calculate(&request.services, months_override)
}
