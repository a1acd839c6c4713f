//! Background calculation pipeline.
//!
//! 1. **Scheduler** (`scheduler`): spawns one task unit per accepted request
//! 2. **Randomness** (`random`): injectable latency and coin-flip source
//! 3. **Outcome** (`outcome`): success/failure simulation over a computed quote
//! 4. **Callback** (`callback`): single best-effort delivery of the outcome

pub mod callback;
pub mod config;
pub mod outcome;
pub mod random;
pub mod scheduler;

pub use callback::{CallbackDispatcher, CallbackError, DeliveryReport, HttpCallbackDispatcher};
pub use config::{CalculationConfig, CallbackConfig, ConfigError};
pub use outcome::{OutcomeSimulator, FAILURE_NOTE, SUCCESS_NOTE};
pub use random::{RandomSource, ThreadRandom};
#[cfg(any(test, feature = "test-util"))]
pub use random::{FixedRandom, SequenceRandom};
pub use scheduler::{TaskScheduler, TaskStage};

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use asynccalc_core::CalculationOutcome;
    use tokio::sync::mpsc;

    use super::{CallbackDispatcher, DeliveryReport};

    /// Accepts every outcome without doing anything.
    pub(crate) struct NoopDispatcher;

    #[async_trait]
    impl CallbackDispatcher for NoopDispatcher {
        async fn dispatch(&self, _url: &str, _outcome: &CalculationOutcome) -> DeliveryReport {
            DeliveryReport::Delivered { status: 200 }
        }
    }

    /// Forwards the target URL of every dispatch on a channel.
    pub(crate) struct ChannelDispatcher {
        tx: mpsc::UnboundedSender<String>,
    }

    impl ChannelDispatcher {
        pub(crate) fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Self { tx }, rx)
        }
    }

    #[async_trait]
    impl CallbackDispatcher for ChannelDispatcher {
        async fn dispatch(&self, url: &str, _outcome: &CalculationOutcome) -> DeliveryReport {
            let _ = self.tx.send(url.to_string());
            DeliveryReport::Delivered { status: 200 }
        }
    }
}
