//! Configuration for circuit breakers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::breaker::CircuitBreaker;
use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::hook::HookRegistry;
use crate::metrics::{MetricSink, NullMetricSink};
use crate::policy::{BreakerPolicy, SuccessRatePolicy};

pub(crate) const DEFAULT_THRESHOLD: f64 = 0.8;
pub(crate) const DEFAULT_MIN_REQUESTS: u64 = 10;
pub(crate) const DEFAULT_COOLDOWN: Duration = Duration::from_secs(5);

/// Builder for creating circuit breakers with custom configurations.
///
/// Every parameter is fixed once [`build`](BreakerBuilder::build) returns.
pub struct BreakerBuilder<P = SuccessRatePolicy>
where
    P: BreakerPolicy,
{
    policy: P,
    min_requests: u64,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
    metric_sink: Arc<dyn MetricSink>,
    hook_registry: Arc<HookRegistry>,
}

impl Default for BreakerBuilder<SuccessRatePolicy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for BreakerBuilder<P>
where
    P: BreakerPolicy + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakerBuilder")
            .field("policy", &self.policy)
            .field("min_requests", &self.min_requests)
            .field("cooldown", &self.cooldown)
            .field("hooks", &self.hook_registry)
            .finish_non_exhaustive()
    }
}

impl BreakerBuilder<SuccessRatePolicy> {
    /// Creates a new builder with default settings: a success rate
    /// threshold of 0.8, 10 minimum requests and a 5 second cooldown.
    pub fn new() -> Self {
        Self {
            policy: SuccessRatePolicy::default(),
            min_requests: DEFAULT_MIN_REQUESTS,
            cooldown: DEFAULT_COOLDOWN,
            clock: Arc::new(SystemClock),
            metric_sink: Arc::new(NullMetricSink),
            hook_registry: Arc::new(HookRegistry::new()),
        }
    }

    /// Sets the minimum success rate, in `(0, 1]`, a window must reach.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.policy = SuccessRatePolicy::unchecked(threshold);
        self
    }
}

impl<P> BreakerBuilder<P>
where
    P: BreakerPolicy,
{
    /// Sets the minimum number of reported outcomes before a window is evaluated.
    pub fn min_requests(mut self, min_requests: u64) -> Self {
        self.min_requests = min_requests;
        self
    }

    /// Sets the minimum time between evaluations, which is also how long
    /// an open circuit waits before admitting probes.
    pub fn cooldown(mut self, duration: Duration) -> Self {
        self.cooldown = duration;
        self
    }

    /// Sets the time source used to measure cooldowns.
    pub fn clock<C: Clock>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sets a metric sink for the circuit breaker.
    pub fn metric_sink<M: MetricSink>(mut self, sink: M) -> Self {
        self.metric_sink = Arc::new(sink);
        self
    }

    /// Sets a hook registry for the circuit breaker.
    pub fn hooks(mut self, hooks: HookRegistry) -> Self {
        self.hook_registry = Arc::new(hooks);
        self
    }

    /// Replaces the evaluation policy.
    pub fn policy<Q: BreakerPolicy>(self, policy: Q) -> BreakerBuilder<Q> {
        BreakerBuilder {
            policy,
            min_requests: self.min_requests,
            cooldown: self.cooldown,
            clock: self.clock,
            metric_sink: self.metric_sink,
            hook_registry: self.hook_registry,
        }
    }

    /// Validates the configuration and builds a closed circuit breaker.
    pub fn build(self) -> Result<CircuitBreaker<P>, ConfigError> {
        self.policy.validate()?;
        if self.min_requests == 0 {
            return Err(ConfigError::ZeroMinRequests);
        }

        Ok(CircuitBreaker::from_parts(
            self.policy,
            self.min_requests,
            self.cooldown,
            self.clock,
            self.metric_sink,
            self.hook_registry,
        ))
    }
}
