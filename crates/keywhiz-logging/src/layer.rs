//! `tracing` layer routing events through the brief formatter.
//!
//! Event fields with special meaning:
//! - `class`: source class, defaults to the event target (module path)
//! - `method`: source method, defaults to empty
//! - `error`: attached failure when recorded as `&dyn Error`
//!
//! Any other field is appended to the message as `name=value`.

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::event::{Failure, LogEvent, Severity};
use crate::init::LoggingContext;

pub const FIELD_MESSAGE: &str = "message";
pub const FIELD_CLASS: &str = "class";
pub const FIELD_METHOD: &str = "method";
pub const FIELD_ERROR: &str = "error";

#[derive(Default)]
struct FieldVisitor {
    message: String,
    class: Option<String>,
    method: Option<String>,
    failure: Option<Failure>,
    extra: Vec<(&'static str, String)>,
}

impl FieldVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        match field.name() {
            FIELD_MESSAGE => self.message = value,
            FIELD_CLASS => self.class = Some(value),
            FIELD_METHOD => self.method = Some(value),
            name => self.extra.push((name, value)),
        }
    }

    fn into_message(self) -> String {
        let mut message = self.message;
        for (name, value) in self.extra {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(name);
            message.push('=');
            message.push_str(&value);
        }
        message
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        if field.name() == FIELD_ERROR {
            self.failure = Some(Failure::from_dyn(value));
        } else {
            self.record_value(field, value.to_string());
        }
    }
}

/// Layer converting `tracing` events into [`LogEvent`]s published on a
/// [`LoggingContext`].
#[derive(Clone)]
pub struct BriefLayer {
    context: LoggingContext,
}

impl BriefLayer {
    pub fn new(context: LoggingContext) -> Self {
        Self { context }
    }

    /// Convert a `tracing` event into the formatter's data model.
    pub fn to_log_event(event: &Event<'_>) -> LogEvent {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let class = visitor
            .class
            .take()
            .unwrap_or_else(|| metadata.target().to_string());
        let method = visitor.method.take().unwrap_or_default();
        let failure = visitor.failure.take();

        let log_event = LogEvent::new(
            Severity::from(*metadata.level()),
            class,
            method,
            visitor.into_message(),
        );
        match failure {
            Some(failure) => log_event.with_failure(failure),
            None => log_event,
        }
    }
}

impl<S> Layer<S> for BriefLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.context.publish(&Self::to_log_event(event));
    }
}
