use adaptive_breaker::{CircuitBreaker, ManualClock};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::error::Error;
use std::fmt;
use std::time::Duration;

// Custom error type that implements Error trait
#[derive(Debug)]
struct BenchError(String);

impl BenchError {
    fn new(msg: &str) -> Self {
        BenchError(msg.to_string())
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Benchmark error: {}", self.0)
    }
}

impl Error for BenchError {}

fn successful_operation() -> Result<(), BenchError> {
    Ok(())
}

fn failing_operation() -> Result<(), BenchError> {
    Err(BenchError::new("Simulated failure"))
}

fn bench_circuit_breaker_closed(c: &mut Criterion) {
    let breaker = CircuitBreaker::new(0.8, 10, Duration::from_secs(30)).unwrap();

    c.bench_function("circuit_breaker_closed_success", |b| {
        b.iter(|| black_box(breaker.call(successful_operation)));
    });
}

fn bench_circuit_breaker_open_rejection(c: &mut Criterion) {
    let breaker = {
        // The manual clock never moves again, so the breaker stays open
        let clock = ManualClock::new();
        let tripped = CircuitBreaker::builder()
            .min_requests(1)
            .cooldown(Duration::from_secs(3600))
            .clock(clock.clone())
            .build()
            .unwrap();
        clock.advance(Duration::from_secs(3600));
        let _ = tripped.call(failing_operation);
        tripped
    };

    c.bench_function("circuit_breaker_open_rejection", |b| {
        b.iter(|| black_box(breaker.call(successful_operation)));
    });
}

fn bench_circuit_breaker_evaluation(c: &mut Criterion) {
    let breaker = CircuitBreaker::new(0.5, 10, Duration::ZERO).unwrap();

    c.bench_function("circuit_breaker_evaluation", |b| {
        b.iter_custom(|iters| {
            let start = std::time::Instant::now();

            for _ in 0..iters {
                // Each block of ten reports completes a window
                for n in 0..10 {
                    breaker.report(black_box(n % 3 != 0));
                }
            }

            start.elapsed()
        });
    });
}

fn bench_circuit_breaker_concurrent(c: &mut Criterion) {
    use std::sync::{Arc, Barrier};
    use std::thread;

    let breaker = CircuitBreaker::builder()
        .threshold(0.5)
        .min_requests(100)
        .cooldown(Duration::from_secs(30))
        .build()
        .unwrap();

    const THREAD_COUNT: usize = 4;
    const ITERATIONS_PER_THREAD: usize = 1000;

    c.bench_function("circuit_breaker_concurrent", |b| {
        b.iter(|| {
            let barrier = Arc::new(Barrier::new(THREAD_COUNT + 1));
            let mut handles = Vec::with_capacity(THREAD_COUNT);

            for _ in 0..THREAD_COUNT {
                let thread_breaker = breaker.clone();
                let thread_barrier = Arc::clone(&barrier);

                handles.push(thread::spawn(move || {
                    thread_barrier.wait();
                    for _ in 0..ITERATIONS_PER_THREAD {
                        let _ = black_box(thread_breaker.call(successful_operation));
                    }
                }));
            }

            // Start all threads simultaneously
            barrier.wait();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });
}

criterion_group!(
    benches,
    bench_circuit_breaker_closed,
    bench_circuit_breaker_open_rejection,
    bench_circuit_breaker_evaluation,
    bench_circuit_breaker_concurrent
);
criterion_main!(benches);
