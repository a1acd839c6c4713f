//! Tunables for task simulation and callback delivery.

use std::time::Duration;

use thiserror::Error;

/// Controls how a scheduled task unit simulates backend processing.
#[derive(Debug, Clone)]
pub struct CalculationConfig {
    /// Lower bound (inclusive) of the simulated processing delay.
    pub min_delay: Duration,
    /// Upper bound (exclusive) of the simulated processing delay.
    pub max_delay: Duration,
    /// Probability that a unit reports `success`.
    pub success_probability: f64,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(10),
            success_probability: 0.5,
        }
    }
}

/// Outbound callback settings.
#[derive(Debug, Clone)]
pub struct CallbackConfig {
    /// Shared secret sent in the `X-ASYNC-TOKEN` header.
    pub token: String,
    /// Timeout for the whole callback request.
    pub timeout: Duration,
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            token: "async-secret".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min delay {min:?} exceeds max delay {max:?}")]
    DelayWindow { min: Duration, max: Duration },
    #[error("success probability must be within [0, 1], got {0}")]
    Probability(f64),
    #[error("callback timeout must be non-zero")]
    CallbackTimeout,
}

impl CalculationConfig {
    /// # Errors
    ///
    /// Returns an error if the delay window is inverted or the probability is
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_delay > self.max_delay {
            return Err(ConfigError::DelayWindow {
                min: self.min_delay,
                max: self.max_delay,
            });
        }
        if !(0.0..=1.0).contains(&self.success_probability) {
            return Err(ConfigError::Probability(self.success_probability));
        }
        Ok(())
    }
}

impl CallbackConfig {
    /// # Errors
    ///
    /// Returns an error if the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::CallbackTimeout);
        }
        Ok(())
    }
}
