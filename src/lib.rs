//! # adaptive-breaker
//!
//! An adaptive circuit breaker that protects callers from repeatedly
//! invoking a failing dependency.
//!
//! The breaker counts call outcomes in an evaluation window. Once enough
//! outcomes have accumulated and a cooldown has passed since the last
//! evaluation, it computes the window's success rate, decides the next
//! state and starts a fresh window. It operates in three states:
//!
//! - **Closed**: Normal operation. Every call is admitted.
//! - **Open**: Calls are rejected immediately without reaching the dependency.
//! - **Half-Open**: After the cooldown, calls are admitted again as probes.
//!   The next evaluation either closes the circuit or opens it again.
//!
//! State and counters sit behind a single lock. The protected operation
//! always runs outside of it.
//!
//! ## Basic Usage
//!
//! ```rust
//! use adaptive_breaker::{BreakerError, CircuitBreaker};
//! use std::fmt;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! struct ServiceError(String);
//!
//! impl fmt::Display for ServiceError {
//!     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
//!         write!(f, "Service error: {}", self.0)
//!     }
//! }
//!
//! impl std::error::Error for ServiceError {}
//!
//! // Open when fewer than 80% of at least 10 calls succeed,
//! // evaluating at most every 5 seconds.
//! let breaker = CircuitBreaker::new(0.8, 10, Duration::from_secs(5)).unwrap();
//!
//! match breaker.call(|| Ok::<_, ServiceError>("Success".to_string())) {
//!     Ok(result) => println!("Call succeeded: {}", result),
//!     Err(BreakerError::Open) => println!("Circuit is open, call was prevented"),
//!     Err(BreakerError::Operation(err)) => println!("Call failed: {}", err),
//! }
//! ```
//!
//! ## Manual admission
//!
//! Callers that cannot wrap their work in a closure can drive the breaker
//! themselves:
//!
//! ```rust
//! use adaptive_breaker::CircuitBreaker;
//!
//! let breaker = CircuitBreaker::builder().build().unwrap();
//!
//! if breaker.allow().is_ok() {
//!     let succeeded = true; // outcome of the real work
//!     breaker.report(succeeded);
//! }
//! ```
//!
//! ## Async Support
//!
//! With the `async` feature enabled:
//!
//! ```rust,ignore
//! let result = breaker.call_async(|| async {
//!     Ok::<_, ServiceError>("Success".to_string())
//! }).await;
//! ```
//!
//! ## Features
//!
//! - `async` - `call_async` for futures
//! - `tracing` - `TracingSink`, which logs breaker events with `tracing`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod breaker;
mod clock;
mod config;
mod error;
mod hook;
mod metrics;
mod policy;
pub mod prelude;
mod state;

// Re-exports
pub use breaker::CircuitBreaker;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BreakerBuilder;
pub use error::{BreakerError, BreakerResult, CircuitOpen, ConfigError};
pub use hook::HookRegistry;
#[cfg(feature = "tracing")]
pub use metrics::TracingSink;
pub use metrics::{MetricSink, NullMetricSink, WindowStats};
pub use policy::{BreakerPolicy, SuccessRatePolicy};
pub use state::{State, Transition};
