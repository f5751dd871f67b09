//! Policy engine deciding the next state when a window is evaluated.

use crate::config::DEFAULT_THRESHOLD;
use crate::error::ConfigError;
use crate::metrics::WindowStats;
use crate::state::State;

/// Decides the state a breaker moves to when a full window is evaluated.
///
/// The breaker only consults the policy once `min_requests` outcomes have
/// accumulated and the cooldown has elapsed, and always resets the window
/// afterwards. Implementations must be pure: they run inside the breaker's
/// critical section.
pub trait BreakerPolicy: Send + Sync + 'static {
    /// Returns the state that follows `current` given the evaluated window.
    fn evaluate(&self, current: State, window: &WindowStats) -> State;

    /// Checks the policy's parameters when the breaker is built.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Default policy comparing the window's success rate against a threshold.
///
/// A half-open breaker always resolves: closed when the rate reaches the
/// threshold, open otherwise. A closed breaker only ever degrades to open.
/// An open breaker stays open whatever the rate; it can only recover
/// through a half-open probe window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuccessRatePolicy {
    threshold: f64,
}

impl SuccessRatePolicy {
    /// Creates a policy requiring at least `threshold` of calls to succeed.
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        let policy = Self { threshold };
        policy.validate()?;
        Ok(policy)
    }

    pub(crate) const fn unchecked(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The minimum acceptable success rate.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for SuccessRatePolicy {
    fn default() -> Self {
        Self::unchecked(DEFAULT_THRESHOLD)
    }
}

impl BreakerPolicy for SuccessRatePolicy {
    fn evaluate(&self, current: State, window: &WindowStats) -> State {
        let healthy = window.success_rate() >= self.threshold;

        match current {
            State::HalfOpen if healthy => State::Closed,
            State::HalfOpen => State::Open,
            _ if !healthy => State::Open,
            other => other,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // NaN fails both comparisons
        if self.threshold > 0.0 && self.threshold <= 1.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidThreshold(self.threshold))
        }
    }
}
