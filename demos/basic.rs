use adaptive_breaker::{BreakerError, CircuitBreaker, TracingSink};
use std::error::Error;
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Custom error type that implements Error trait
#[derive(Debug)]
struct ServiceError(String);

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service error: {}", self.0)
    }
}

impl Error for ServiceError {}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let breaker = CircuitBreaker::builder()
        .threshold(0.8) // at least 80% of calls must succeed
        .min_requests(10) // judged over at least 10 calls
        .cooldown(Duration::from_secs(2)) // evaluated at most every 2 seconds
        .metric_sink(TracingSink::new("inventory-service"))
        .build()
        .expect("valid breaker configuration");

    println!("Circuit initial state: {:?}", breaker.current_state());

    // The service fails every other call for the first 20 calls, then recovers
    let mut calls = 0u32;
    let mut call_service = || -> Result<String, ServiceError> {
        calls += 1;
        if calls <= 20 && calls % 2 == 0 {
            Err(ServiceError("External service error".to_string()))
        } else {
            Ok("Success".to_string())
        }
    };

    for attempt in 1..=60 {
        match breaker.call(&mut call_service) {
            Ok(result) => {
                println!("Attempt {}: call succeeded with result: {}", attempt, result)
            }
            Err(BreakerError::Open) => {
                println!("Attempt {}: circuit is open, request blocked", attempt)
            }
            Err(BreakerError::Operation(err)) => {
                println!("Attempt {}: call failed with error: {}", attempt, err)
            }
        }

        println!(
            "Current state: {}, window: {:?}",
            breaker.current_state(),
            breaker.window()
        );

        thread::sleep(Duration::from_millis(250));
    }
}
