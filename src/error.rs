//! Error types for the circuit breaker library.

use thiserror::Error;

/// Result type for calls made through a circuit breaker.
pub type BreakerResult<T, E> = Result<T, BreakerError<E>>;

/// Returned by an admission check when the breaker is open.
///
/// The protected operation was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("circuit is open")]
pub struct CircuitOpen;

/// Error type for calls made through a circuit breaker.
#[derive(Debug, Error)]
pub enum BreakerError<E> {
    /// The circuit is open, the call was rejected without running.
    #[error("circuit is open")]
    Open,

    /// The underlying operation ran and failed.
    #[error("operation error: {0}")]
    Operation(#[source] E),
}

impl<E> BreakerError<E> {
    /// Whether the call was rejected by the breaker.
    pub fn is_open(&self) -> bool {
        matches!(self, BreakerError::Open)
    }

    /// Returns the operation's own error, if it ran.
    pub fn into_operation(self) -> Option<E> {
        match self {
            BreakerError::Open => None,
            BreakerError::Operation(e) => Some(e),
        }
    }
}

impl<E> From<CircuitOpen> for BreakerError<E> {
    fn from(_: CircuitOpen) -> Self {
        BreakerError::Open
    }
}

/// Invalid circuit breaker construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// Success rate threshold outside of `(0, 1]`.
    #[error("threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),

    /// A minimum sample size of zero would evaluate an empty window.
    #[error("min_requests must be at least 1")]
    ZeroMinRequests,
}
