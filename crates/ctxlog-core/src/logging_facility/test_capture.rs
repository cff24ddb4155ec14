//! Test capture mode for deterministic logging assertions
//!
//! This module provides a test-only subscriber that captures the events
//! [`TracingSink`](crate::sink::TracingSink) emits, in memory, for assertion
//! in tests.

use ctxlog_core_types::schema::{FIELD_FIELDS, FIELD_SEVERITY};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::field::Visit;
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// A captured log event with all its fields
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: Option<String>,
    pub severity: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// The decorated field set, parsed back from its JSON rendering
    pub fn record_fields(&self) -> Option<serde_json::Value> {
        self.fields
            .get(FIELD_FIELDS)
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    /// The `traceId` of the decorated field set
    pub fn trace_id(&self) -> Option<String> {
        self.record_fields()?
            .get(ctxlog_core_types::schema::FIELD_TRACE_ID)?
            .as_str()
            .map(str::to_string)
    }
}

struct FieldVisitor {
    fields: HashMap<String, String>,
}

impl FieldVisitor {
    fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields
            .insert(field.name().to_string(), value.to_string());
    }
}

/// Test capture layer for collecting log events
pub struct TestCaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let layer = Self {
            events: events.clone(),
        };
        let capture = TestCapture { events };
        (layer, capture)
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::new();
        event.record(&mut visitor);

        let captured = CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.fields.get("message").cloned(),
            severity: visitor.fields.get(FIELD_SEVERITY).cloned(),
            fields: visitor.fields,
        };

        self.events
            .lock()
            .map(|mut events| events.push(captured))
            .ok();
    }
}

/// Handle for accessing captured events in tests
#[derive(Clone)]
pub struct TestCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Get all captured events
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events whose decorated fields carry `trace_id`
    ///
    /// Tests share one global capture; a unique trace id per test keeps
    /// their assertions independent.
    pub fn events_for_trace(&self, trace_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.trace_id().as_deref() == Some(trace_id))
            .collect()
    }

    /// Assert that an event exists with the given trace id and message
    ///
    /// # Panics
    ///
    /// Panics if the event is not found
    pub fn assert_record_exists(&self, trace_id: &str, message: &str) {
        let events = self.events_for_trace(trace_id);
        let found = events.iter().any(|e| e.message.as_deref() == Some(message));
        assert!(
            found,
            "Expected record trace_id={} message={:?} not found in {} captured events",
            trace_id,
            message,
            events.len()
        );
    }

    /// Count events matching a predicate
    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

use std::sync::OnceLock;

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Initialize test capture mode
///
/// This should be called at the start of each test that needs to capture logs.
/// Returns a shared global capture instance.
///
/// # Example
///
/// ```
/// use ctxlog_core::logging_facility::test_capture::init_test_capture;
/// use ctxlog_core::sink::{Sink, TracingSink};
/// use ctxlog_core::{Fields, Level};
///
/// let capture = init_test_capture();
/// let fields: Fields = [("traceId", "doc-trace")].into_iter().collect();
/// TracingSink.write(Level::Info, "hello", &fields);
/// capture.assert_record_exists("doc-trace", "hello");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_event_trace_id() {
        let mut fields = HashMap::new();
        fields.insert(
            FIELD_FIELDS.to_string(),
            r#"{"traceId":"t-9","gid":1}"#.to_string(),
        );
        let event = CapturedEvent {
            level: Level::INFO,
            target: "ctxlog".to_string(),
            message: Some("hi".to_string()),
            severity: Some("info".to_string()),
            fields,
        };

        let cloned = event.clone();
        assert_eq!(cloned.level, event.level);
        assert_eq!(cloned.trace_id().as_deref(), Some("t-9"));
    }
}
