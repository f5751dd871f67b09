//! Re-exports common types for convenient usage.
//!
//! # Example
//! ```rust
//! use adaptive_breaker::prelude::*;
//!
//! let breaker = CircuitBreaker::builder().threshold(0.5).build().unwrap();
//! assert_eq!(breaker.current_state(), State::Closed);
//! ```

pub use crate::breaker::CircuitBreaker;
pub use crate::error::{BreakerError, BreakerResult, CircuitOpen};
pub use crate::policy::BreakerPolicy;
pub use crate::state::State;
