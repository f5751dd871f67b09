//! Core circuit breaker implementation.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::config::BreakerBuilder;
use crate::error::{BreakerError, BreakerResult, CircuitOpen, ConfigError};
use crate::hook::HookRegistry;
use crate::metrics::{MetricSink, WindowStats};
use crate::policy::{BreakerPolicy, SuccessRatePolicy};
use crate::state::{State, Transition};

/// Everything an admission check or report may mutate.
///
/// State, window and `last_check` live behind one lock so that a transition
/// and its window reset are never observed apart.
#[derive(Debug)]
struct Core {
    state: State,
    window: WindowStats,
    last_check: Instant,
}

/// What a report produced, carried out of the critical section.
struct ReportOutcome {
    evaluated: Option<WindowStats>,
    transition: Option<Transition>,
}

/// Inner state of the circuit breaker, shared between clones.
struct BreakerInner<P>
where
    P: BreakerPolicy,
{
    core: Mutex<Core>,
    policy: P,
    min_requests: u64,
    cooldown: Duration,
    clock: Arc<dyn Clock>,
    metric_sink: Arc<dyn MetricSink>,
    hooks: Arc<HookRegistry>,
}

/// A circuit breaker that tracks call outcomes over an evaluation window
/// and rejects calls while the observed success rate is too low.
///
/// Cloning is cheap and yields a handle to the same breaker.
pub struct CircuitBreaker<P = SuccessRatePolicy>
where
    P: BreakerPolicy,
{
    inner: Arc<BreakerInner<P>>,
}

impl CircuitBreaker<SuccessRatePolicy> {
    /// Creates a closed breaker that opens when fewer than `threshold` of
    /// at least `min_requests` calls succeed, evaluating at most once per
    /// `cooldown`.
    pub fn new(
        threshold: f64,
        min_requests: u64,
        cooldown: Duration,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .threshold(threshold)
            .min_requests(min_requests)
            .cooldown(cooldown)
            .build()
    }

    /// Creates a new builder for customizing a circuit breaker.
    pub fn builder() -> BreakerBuilder<SuccessRatePolicy> {
        BreakerBuilder::new()
    }
}

impl<P> CircuitBreaker<P>
where
    P: BreakerPolicy,
{
    pub(crate) fn from_parts(
        policy: P,
        min_requests: u64,
        cooldown: Duration,
        clock: Arc<dyn Clock>,
        metric_sink: Arc<dyn MetricSink>,
        hooks: Arc<HookRegistry>,
    ) -> Self {
        let core = Core {
            state: State::Closed,
            window: WindowStats::default(),
            last_check: clock.now(),
        };

        let inner = BreakerInner {
            core: Mutex::new(core),
            policy,
            min_requests,
            cooldown,
            clock,
            metric_sink,
            hooks,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Gets the current state of the circuit breaker.
    pub fn current_state(&self) -> State {
        self.inner.core.lock().state
    }

    /// Snapshot of the outcomes reported since the last evaluation.
    pub fn window(&self) -> WindowStats {
        self.inner.core.lock().window
    }

    /// Instant of the last evaluation, or of construction if none has run.
    pub fn last_check(&self) -> Instant {
        self.inner.core.lock().last_check
    }

    /// Minimum number of outcomes before a window is evaluated.
    pub fn min_requests(&self) -> u64 {
        self.inner.min_requests
    }

    /// Minimum time between evaluations and before an open circuit probes.
    pub fn cooldown(&self) -> Duration {
        self.inner.cooldown
    }

    /// The evaluation policy.
    pub fn policy(&self) -> &P {
        &self.inner.policy
    }

    /// Checks whether a call may proceed.
    ///
    /// An open circuit whose cooldown has elapsed moves to half-open first
    /// and admits the call. Never blocks beyond the internal lock and never
    /// touches the window.
    pub fn allow(&self) -> Result<(), CircuitOpen> {
        let (state, transition) = {
            let mut core = self.inner.core.lock();
            let now = self.inner.clock.now();

            let mut transition = None;
            if core.state == State::Open
                && now.saturating_duration_since(core.last_check) >= self.inner.cooldown
            {
                core.state = State::HalfOpen;
                transition = Some(Transition::cooldown_elapsed());
            }

            (core.state, transition)
        };

        if let Some(transition) = transition {
            self.publish_transition(&transition);
        }

        if state.admits() {
            Ok(())
        } else {
            self.inner.metric_sink.record_rejection();
            self.inner.hooks.execute_rejected_hook();
            Err(CircuitOpen)
        }
    }

    /// Feeds the outcome of a completed call back into the breaker.
    ///
    /// Once at least `min_requests` outcomes have accumulated and the
    /// cooldown has elapsed since the last evaluation, the window is
    /// evaluated and reset. Reports are accepted in every state.
    pub fn report(&self, success: bool) {
        let outcome = {
            let mut core = self.inner.core.lock();
            core.window.record(success);

            let now = self.inner.clock.now();
            if core.window.requests >= self.inner.min_requests
                && now.saturating_duration_since(core.last_check) >= self.inner.cooldown
            {
                self.evaluate(&mut core, now)
            } else {
                ReportOutcome {
                    evaluated: None,
                    transition: None,
                }
            }
        };

        self.inner.hooks.execute_outcome_hook(success);

        if let Some(window) = outcome.evaluated {
            self.inner.metric_sink.record_evaluation(&window);
        }
        if let Some(transition) = outcome.transition {
            self.publish_transition(&transition);
        }
    }

    /// Executes a function wrapped by the circuit breaker.
    ///
    /// The function is not invoked if the circuit is open. Otherwise it
    /// runs with no breaker lock held and its result is reported.
    pub fn call<F, T, E>(&self, f: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.allow()?;

        let start = Instant::now();
        let result = f();
        self.complete(result.is_ok(), start.elapsed());

        result.map_err(BreakerError::Operation)
    }

    fn evaluate(&self, core: &mut Core, now: Instant) -> ReportOutcome {
        let window = core.window;
        let from = core.state;
        let to = self.inner.policy.evaluate(from, &window);

        core.state = to;
        core.window.reset();
        core.last_check = now;

        let transition = (from != to).then(|| Transition {
            from,
            to,
            success_rate: Some(window.success_rate()),
        });

        ReportOutcome {
            evaluated: Some(window),
            transition,
        }
    }

    fn complete(&self, success: bool, duration: Duration) {
        self.report(success);
        self.inner.metric_sink.record_call(success, duration);
    }

    fn publish_transition(&self, transition: &Transition) {
        self.inner.metric_sink.record_state_transition(transition);
        self.inner.hooks.execute_state_transition_hook(transition);
    }
}

impl<P> Clone for CircuitBreaker<P>
where
    P: BreakerPolicy,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P> fmt::Debug for CircuitBreaker<P>
where
    P: BreakerPolicy + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.inner.core.lock();
        f.debug_struct("CircuitBreaker")
            .field("state", &core.state)
            .field("window", &core.window)
            .field("policy", &self.inner.policy)
            .field("min_requests", &self.inner.min_requests)
            .field("cooldown", &self.inner.cooldown)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "async")]
impl<P> CircuitBreaker<P>
where
    P: BreakerPolicy,
{
    /// Executes an async function wrapped by the circuit breaker.
    ///
    /// No lock is held across the await. A future dropped before it
    /// completes never reports an outcome.
    #[cfg_attr(docsrs, doc(cfg(feature = "async")))]
    pub async fn call_async<F, Fut, T, E>(&self, f: F) -> BreakerResult<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        self.allow()?;

        let start = Instant::now();
        let result = f().await;
        self.complete(result.is_ok(), start.elapsed());

        result.map_err(BreakerError::Operation)
    }
}
