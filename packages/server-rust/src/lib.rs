//! Async calc server -- accepts pricing requests over HTTP, computes them in
//! the background, and delivers the outcome to a caller-supplied callback.

pub mod error;
pub mod logging;
pub mod network;
pub mod service;

pub use error::ProcessError;
pub use network::{NetworkConfig, NetworkModule, ShutdownController};
pub use service::{
    CalculationConfig, CallbackConfig, CallbackDispatcher, HttpCallbackDispatcher, RandomSource,
    TaskScheduler, ThreadRandom,
};

/// Shared-secret header used both to authenticate inbound requests and to
/// authenticate outbound callbacks to their receiver.
pub const ASYNC_TOKEN_HEADER: &str = "x-async-token";
