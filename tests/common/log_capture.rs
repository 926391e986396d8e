//! Captures tracing events emitted on the current thread so tests can assert
//! on diagnostics without parsing stderr.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

/// Thread-scoped capture; stops when dropped.
pub struct TestLogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    _guard: tracing::subscriber::DefaultGuard,
}

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl TestLogCapture {
    /// Install a capturing subscriber as the thread default.
    pub fn start() -> Self {
        let events = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(CaptureLayer {
            events: Arc::clone(&events),
        });

        Self {
            events,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn messages(&self, level: Option<Level>) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| level.is_none_or(|l| e.level == l))
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn assert_logged(&self, needle: &str) {
        let messages = self.messages(None);
        assert!(
            messages.iter().any(|m| m.contains(needle)),
            "Expected log containing '{needle}'. Logged: {messages:#?}"
        );
    }

    pub fn assert_logged_at_level(&self, level: Level, needle: &str) {
        let messages = self.messages(Some(level));
        assert!(
            messages.iter().any(|m| m.contains(needle)),
            "Expected {level} log containing '{needle}'. Logged at {level}: {messages:#?}"
        );
    }

    pub fn assert_not_logged(&self, needle: &str) {
        let messages = self.messages(None);
        assert!(
            !messages.iter().any(|m| m.contains(needle)),
            "Did not expect log containing '{needle}'. Logged: {messages:#?}"
        );
    }

    pub fn assert_no_errors(&self) {
        let errors = self.messages(Some(Level::ERROR));
        assert!(errors.is_empty(), "Unexpected errors: {errors:#?}");
    }

    pub fn assert_field_logged(&self, name: &str, value: &str) {
        let events = self.events();
        assert!(
            events
                .iter()
                .flat_map(|e| e.fields.iter())
                .any(|(k, v)| k == name && v.contains(value)),
            "Expected field {name}={value}. Logged fields: {:#?}",
            events.iter().map(|e| &e.fields).collect::<Vec<_>>()
        );
    }
}

struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, name: &str, value: String) {
        if name == "message" {
            self.message = value;
        } else {
            self.fields.push((name.to_string(), value));
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.push(field.name(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.push(field.name(), value.to_string());
    }
}
