//! Outcome simulator: turns a computed quote into a success or failure outcome.

use std::sync::Arc;

use asynccalc_core::{CalculationOutcome, Quote};

use super::random::RandomSource;

/// Note attached to successful outcomes.
pub const SUCCESS_NOTE: &str = "calculated by async service";
/// Note attached to simulated failures.
pub const FAILURE_NOTE: &str = "simulated failure";

/// Flips an independent coin per task to decide its terminal status.
#[derive(Clone)]
pub struct OutcomeSimulator {
    random: Arc<dyn RandomSource>,
    success_probability: f64,
}

impl OutcomeSimulator {
    #[must_use]
    pub fn new(random: Arc<dyn RandomSource>, success_probability: f64) -> Self {
        Self {
            random,
            success_probability,
        }
    }

    /// Decides the outcome for an already computed quote.
    #[must_use]
    pub fn decide(&self, quote: Quote) -> CalculationOutcome {
        if self.random.chance(self.success_probability) {
            CalculationOutcome::success(quote, SUCCESS_NOTE)
        } else {
            CalculationOutcome::failure(FAILURE_NOTE)
        }
    }
}
