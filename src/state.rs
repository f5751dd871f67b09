//! Circuit breaker states and the transitions between them.

use std::fmt::{self, Display, Formatter};

/// Represents the possible states of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Circuit is closed and every call is admitted.
    Closed,

    /// Circuit is open and every call is rejected.
    Open,

    /// Circuit admits calls on probation; the next evaluation either
    /// closes it again or sends it back to open.
    HalfOpen,
}

impl State {
    /// Returns a short, stable label for the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Closed => "closed",
            State::Open => "open",
            State::HalfOpen => "half-open",
        }
    }

    /// Whether a call would be admitted while in this state.
    pub fn admits(&self) -> bool {
        !matches!(self, State::Open)
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change observed inside the breaker's critical section and
/// published to hooks and metric sinks once the lock is released.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// State before the change.
    pub from: State,

    /// State after the change.
    pub to: State,

    /// Success rate of the window that triggered the change.
    ///
    /// `None` for the open to half-open move, which is driven by elapsed
    /// time during an admission check rather than by an evaluation.
    pub success_rate: Option<f64>,
}

impl Transition {
    pub(crate) fn cooldown_elapsed() -> Self {
        Self {
            from: State::Open,
            to: State::HalfOpen,
            success_rate: None,
        }
    }

    /// True when a half-open breaker recovered to closed.
    pub fn is_recovery(&self) -> bool {
        self.from == State::HalfOpen && self.to == State::Closed
    }

    /// True when the breaker moved into the open state.
    pub fn is_trip(&self) -> bool {
        self.to == State::Open
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.success_rate {
            Some(rate) => write!(f, "{} -> {} (success rate {:.3})", self.from, self.to, rate),
            None => write!(f, "{} -> {} (cooldown elapsed)", self.from, self.to),
        }
    }
}
