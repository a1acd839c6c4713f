//! Injectable randomness for task latency and outcome simulation.
//!
//! Production code uses [`ThreadRandom`]. With the `test-util` feature (and in
//! this crate's own tests) `FixedRandom` and `SequenceRandom` make latency and
//! success/failure deterministic.

#[cfg(any(test, feature = "test-util"))]
use std::collections::VecDeque;
use std::time::Duration;

#[cfg(any(test, feature = "test-util"))]
use parking_lot::Mutex;
use rand::Rng;

/// Source of the random draws a task unit needs.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[min, max)` at millisecond granularity.
    /// Returns `min` when the window is empty.
    fn delay_between(&self, min: Duration, max: Duration) -> Duration;

    /// Returns `true` with the given probability (clamped to `[0, 1]`).
    fn chance(&self, probability: f64) -> bool;
}

/// Thread-local `rand` generator, seeded from the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn delay_between(&self, min: Duration, max: Duration) -> Duration {
        let lo = duration_millis(min);
        let hi = duration_millis(max);
        if hi <= lo {
            return min;
        }
        Duration::from_millis(rand::rng().random_range(lo..hi))
    }

    fn chance(&self, probability: f64) -> bool {
        if probability.is_nan() {
            return false;
        }
        rand::rng().random_bool(probability.clamp(0.0, 1.0))
    }
}

fn duration_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Always returns the same delay and the same coin-flip result.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    pub delay: Duration,
    pub success: bool,
}

#[cfg(any(test, feature = "test-util"))]
impl RandomSource for FixedRandom {
    fn delay_between(&self, _min: Duration, _max: Duration) -> Duration {
        self.delay
    }

    fn chance(&self, _probability: f64) -> bool {
        self.success
    }
}

/// Replays a scripted sequence of coin-flip results, then repeats the last one.
///
/// Delays are fixed. Useful when several units must take different branches.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug)]
pub struct SequenceRandom {
    delay: Duration,
    flips: Mutex<VecDeque<bool>>,
    last: Mutex<bool>,
}

#[cfg(any(test, feature = "test-util"))]
impl SequenceRandom {
    #[must_use]
    pub fn new(delay: Duration, flips: impl IntoIterator<Item = bool>) -> Self {
        Self {
            delay,
            flips: Mutex::new(flips.into_iter().collect()),
            last: Mutex::new(true),
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl RandomSource for SequenceRandom {
    fn delay_between(&self, _min: Duration, _max: Duration) -> Duration {
        self.delay
    }

    fn chance(&self, _probability: f64) -> bool {
        let mut last = self.last.lock();
        if let Some(next) = self.flips.lock().pop_front() {
            *last = next;
        }
        *last
    }
}
