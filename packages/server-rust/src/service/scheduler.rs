//! Task scheduler: one fire-and-forget unit per accepted request.
//!
//! Each unit walks `Scheduled -> Delayed -> Computed -> Delivered`:
//! it sleeps for a random latency, prices the request, flips the outcome coin,
//! and hands the result to the [`CallbackDispatcher`] once. The spawned
//! handle is dropped immediately; units are never joined or cancelled.

use std::sync::Arc;

use asynccalc_core::{quote_request, CalculationRequest};
use tracing::{debug, info, info_span, Instrument};

use super::callback::{CallbackDispatcher, DeliveryReport};
use super::config::CalculationConfig;
use super::outcome::OutcomeSimulator;
use super::random::RandomSource;
use crate::network::ShutdownController;

/// Lifecycle stage of a task unit, used in log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStage {
    Scheduled,
    Delayed,
    Computed,
    Delivered,
}

impl TaskStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Delayed => "delayed",
            Self::Computed => "computed",
            Self::Delivered => "delivered",
        }
    }
}

/// Launches and runs task units. Cheap to clone; all shared parts are `Arc`s.
#[derive(Clone)]
pub struct TaskScheduler {
    config: Arc<CalculationConfig>,
    random: Arc<dyn RandomSource>,
    simulator: OutcomeSimulator,
    dispatcher: Arc<dyn CallbackDispatcher>,
    shutdown: Arc<ShutdownController>,
}

impl TaskScheduler {
    #[must_use]
    pub fn new(
        config: CalculationConfig,
        random: Arc<dyn RandomSource>,
        dispatcher: Arc<dyn CallbackDispatcher>,
        shutdown: Arc<ShutdownController>,
    ) -> Self {
        let simulator = OutcomeSimulator::new(Arc::clone(&random), config.success_probability);
        Self {
            config: Arc::new(config),
            random,
            simulator,
            dispatcher,
            shutdown,
        }
    }

    /// Spawns a unit for `request` and returns without waiting for it.
    ///
    /// The unit holds a task guard on the shutdown controller until its
    /// callback attempt finishes, so graceful shutdown can wait for it.
    pub fn schedule(&self, request: CalculationRequest) {
        let guard = self.shutdown.task_guard();
        let scheduler = self.clone();
        let span = info_span!("calculation", calculation_id = request.calculation_id);

        debug!(
            calculation_id = request.calculation_id,
            stage = TaskStage::Scheduled.as_str(),
            "task unit spawned"
        );

        tokio::spawn(
            async move {
                let _guard = guard;
                scheduler.run(request).await;
            }
            .instrument(span),
        );
    }

    /// Runs one unit to completion in the current task.
    ///
    /// `schedule` uses this behind `tokio::spawn`; tests call it directly.
    pub async fn run(&self, request: CalculationRequest) -> DeliveryReport {
        let delay = self
            .random
            .delay_between(self.config.min_delay, self.config.max_delay);
        debug!(
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            stage = TaskStage::Delayed.as_str(),
            "simulating processing latency"
        );
        tokio::time::sleep(delay).await;

        let quote = quote_request(&request);
        let outcome = self.simulator.decide(quote);
        info!(
            stage = TaskStage::Computed.as_str(),
            outcome = outcome.status().as_str(),
            total_cost = quote.total_cost,
            duration_months = quote.duration_months,
            "calculation computed"
        );

        let report = self.dispatcher.dispatch(&request.callback_url, &outcome).await;
        debug!(stage = TaskStage::Delivered.as_str(), ?report, "task unit finished");
        report
    }
}
