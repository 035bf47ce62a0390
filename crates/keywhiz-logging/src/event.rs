//! Log event data model: severity, failure and the event itself.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Line terminator used inside rendered failures.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Ordered severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Finest,
    Finer,
    Fine,
    Config,
    Info,
    Warning,
    Severe,
}

impl Severity {
    /// Marker token embedded in the formatted line.
    ///
    /// `Severe` takes precedence over `Warning`; every other level has no marker.
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Severe => "**ERROR**",
            Severity::Warning => "(warning)",
            _ => "",
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Severe,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG => Severity::Fine,
            tracing::Level::TRACE => Severity::Finest,
        }
    }
}

impl From<Severity> for tracing::level_filters::LevelFilter {
    fn from(severity: Severity) -> Self {
        use tracing::level_filters::LevelFilter;

        match severity {
            Severity::Severe => LevelFilter::ERROR,
            Severity::Warning => LevelFilter::WARN,
            Severity::Info => LevelFilter::INFO,
            Severity::Config | Severity::Fine => LevelFilter::DEBUG,
            Severity::Finer | Severity::Finest => LevelFilter::TRACE,
        }
    }
}

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Process-unique integer id of the calling thread, assigned on first use.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// An error attached to a log event, rendered as a stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    kind: String,
    message: String,
    frames: Vec<String>,
    cause: Option<Box<Failure>>,
}

impl Failure {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            frames: Vec::new(),
            cause: None,
        }
    }

    /// Build from a typed error; the `source()` chain becomes the cause chain.
    pub fn from_error<E: Error + 'static>(err: &E) -> Self {
        let mut failure = Self::from_dyn(err);
        failure.kind = std::any::type_name::<E>().to_string();
        failure
    }

    /// Build from a type-erased error. The concrete type is unknown, so only
    /// messages are kept.
    pub fn from_dyn(err: &(dyn Error + 'static)) -> Self {
        Self {
            kind: String::new(),
            message: err.to_string(),
            frames: Vec::new(),
            cause: err.source().map(|source| Box::new(Self::from_dyn(source))),
        }
    }

    pub fn with_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.frames = frames.into_iter().map(Into::into).collect();
        self
    }

    /// Use the lines of a captured backtrace as frames. Disabled or
    /// unsupported backtraces leave the frames untouched.
    pub fn with_backtrace(self, backtrace: &Backtrace) -> Self {
        if backtrace.status() != BacktraceStatus::Captured {
            return self;
        }
        let rendered = backtrace.to_string();
        let frames: Vec<String> = rendered
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        self.with_frames(frames)
    }

    pub fn with_cause(mut self, cause: Failure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    /// Render the failure and its causes, every line ended by [`LINE_SEPARATOR`].
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut current = Some(self);
        let mut first = true;

        while let Some(failure) = current {
            if !first {
                out.push_str("Caused by: ");
            }
            out.push_str(&failure.headline());
            out.push_str(LINE_SEPARATOR);
            for frame in &failure.frames {
                out.push_str("\tat ");
                out.push_str(frame);
                out.push_str(LINE_SEPARATOR);
            }
            current = failure.cause();
            first = false;
        }

        out
    }

    fn headline(&self) -> String {
        match (self.kind.is_empty(), self.message.is_empty()) {
            (false, false) => format!("{}: {}", self.kind, self.message),
            (false, true) => self.kind.clone(),
            (true, _) => self.message.clone(),
        }
    }
}

/// One log call, as handed to the formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub severity: Severity,
    pub thread_id: u64,
    pub source_class: String,
    pub source_method: String,
    /// Message template; placeholders are only substituted when `args` is set.
    pub message: String,
    pub args: Option<Vec<String>>,
    pub failure: Option<Failure>,
}

impl LogEvent {
    /// Create an event stamped with the current time and calling thread.
    pub fn new(
        severity: Severity,
        source_class: impl Into<String>,
        source_method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            severity,
            thread_id: current_thread_id(),
            source_class: source_class.into(),
            source_method: source_method.into(),
            message: message.into(),
            args: None,
            failure: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn with_args<I, T>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.args = Some(args.into_iter().map(|arg| arg.to_string()).collect());
        self
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }
}
