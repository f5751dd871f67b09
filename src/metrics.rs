//! Evaluation window counters and metric sinks.

use std::time::Duration;

use crate::state::Transition;

/// Trait for metrics sinks that can receive circuit breaker events.
///
/// Sinks are always invoked after the breaker has released its lock.
pub trait MetricSink: Send + Sync + 'static {
    /// Records a state transition event.
    fn record_state_transition(&self, transition: &Transition);

    /// Records an evaluation of a full window, whether or not it changed state.
    fn record_evaluation(&self, window: &WindowStats);

    /// Records a call rejected because the circuit was open.
    fn record_rejection(&self);

    /// Records the result of a call made through the breaker.
    fn record_call(&self, success: bool, duration: Duration);
}

/// A null metrics sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMetricSink;

impl MetricSink for NullMetricSink {
    fn record_state_transition(&self, _transition: &Transition) {}
    fn record_evaluation(&self, _window: &WindowStats) {}
    fn record_rejection(&self) {}
    fn record_call(&self, _success: bool, _duration: Duration) {}
}

/// Outcomes accumulated since the last evaluation.
///
/// Outside the breaker's critical section `requests == successes + failures`
/// always holds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowStats {
    /// Outcomes reported since the last evaluation.
    pub requests: u64,
    /// Successful outcomes reported since the last evaluation.
    pub successes: u64,
    /// Failed outcomes reported since the last evaluation.
    pub failures: u64,
}

impl WindowStats {
    pub(crate) fn record(&mut self, success: bool) {
        self.requests += 1;
        if success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = WindowStats::default();
    }

    /// Fraction of successful outcomes, `1.0` for an empty window.
    pub fn success_rate(&self) -> f64 {
        if self.requests == 0 {
            return 1.0;
        }

        self.successes as f64 / self.requests as f64
    }

    /// Whether nothing has been reported since the last evaluation.
    pub fn is_empty(&self) -> bool {
        self.requests == 0
    }
}

/// Metric sink that emits breaker events as `tracing` events.
#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: std::borrow::Cow<'static, str>,
}

#[cfg(feature = "tracing")]
impl TracingSink {
    /// Creates a sink that tags every event with the protected dependency's name.
    pub fn new(name: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(feature = "tracing")]
impl MetricSink for TracingSink {
    fn record_state_transition(&self, transition: &Transition) {
        let from = transition.from.as_str();
        let to = transition.to.as_str();
        let rate = transition.success_rate;

        if transition.is_recovery() {
            tracing::info!(breaker = %self.name, from, to, success_rate = ?rate, "breaker closed after successful recovery");
        } else if transition.from == crate::State::HalfOpen && transition.is_trip() {
            tracing::warn!(breaker = %self.name, from, to, success_rate = ?rate, "breaker reopened due to low success rate");
        } else if transition.is_trip() {
            tracing::warn!(breaker = %self.name, from, to, success_rate = ?rate, "breaker opened due to low success rate");
        } else {
            tracing::info!(breaker = %self.name, from, to, "breaker admitting probes");
        }
    }

    fn record_evaluation(&self, window: &WindowStats) {
        tracing::debug!(
            breaker = %self.name,
            requests = window.requests,
            successes = window.successes,
            failures = window.failures,
            success_rate = window.success_rate(),
            "window evaluated"
        );
    }

    fn record_rejection(&self) {
        tracing::trace!(breaker = %self.name, "call rejected, circuit open");
    }

    fn record_call(&self, success: bool, duration: Duration) {
        tracing::trace!(breaker = %self.name, success, ?duration, "call completed");
    }
}
