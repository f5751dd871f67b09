#![cfg(feature = "tracing")]

use adaptive_breaker::{CircuitBreaker, ManualClock, TracingSink};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

const COOLDOWN: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    level: Level,
    message: String,
    breaker: String,
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    breaker: String,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "breaker" => self.breaker = format!("{:?}", value),
            _ => {}
        }
    }
}

/// Layer that keeps every event it sees.
#[derive(Clone, Default)]
struct CaptureLayer(Arc<Mutex<Vec<Captured>>>);

impl CaptureLayer {
    fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .iter()
            .filter(|event| event.level == level)
            .map(|event| event.message.clone())
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.0.lock().push(Captured {
            level: *event.metadata().level(),
            message: visitor.message,
            breaker: visitor.breaker,
        });
    }
}

fn traced_breaker() -> (CircuitBreaker, ManualClock) {
    let clock = ManualClock::new();
    let breaker = CircuitBreaker::builder()
        .threshold(0.5)
        .min_requests(2)
        .cooldown(COOLDOWN)
        .clock(clock.clone())
        .metric_sink(TracingSink::new("inventory"))
        .build()
        .unwrap();
    (breaker, clock)
}

#[test]
fn test_transitions_logged_at_matching_levels() {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        let (breaker, clock) = traced_breaker();

        // Closed -> Open
        clock.advance(COOLDOWN);
        breaker.report(false);
        breaker.report(false);
        assert!(breaker.allow().is_err());

        // Open -> HalfOpen -> Open
        clock.advance(COOLDOWN);
        assert!(breaker.allow().is_ok());
        breaker.report(false);
        breaker.report(false);

        // Open -> HalfOpen -> Closed
        clock.advance(COOLDOWN);
        assert!(breaker.allow().is_ok());
        breaker.report(true);
        breaker.report(true);
    });

    assert_eq!(
        layer.at(Level::WARN),
        vec![
            "breaker opened due to low success rate",
            "breaker reopened due to low success rate",
        ]
    );
    assert_eq!(
        layer.at(Level::INFO),
        vec![
            "breaker admitting probes",
            "breaker admitting probes",
            "breaker closed after successful recovery",
        ]
    );
    assert_eq!(layer.at(Level::DEBUG).len(), 3);
    assert!(layer.at(Level::DEBUG).iter().all(|m| m == "window evaluated"));
    assert_eq!(layer.at(Level::TRACE), vec!["call rejected, circuit open"]);

    assert!(layer.0.lock().iter().all(|event| event.breaker == "inventory"));
}

#[test]
fn test_healthy_evaluation_logs_no_transition() {
    let layer = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        let (breaker, clock) = traced_breaker();
        clock.advance(COOLDOWN);
        breaker.report(true);
        breaker.report(false);
    });

    assert!(layer.at(Level::WARN).is_empty());
    assert!(layer.at(Level::INFO).is_empty());
    assert_eq!(layer.at(Level::DEBUG), vec!["window evaluated"]);
}
