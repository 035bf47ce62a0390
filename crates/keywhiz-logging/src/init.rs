//! Logging initialization module
//!
//! [`LoggingContext`] owns the sink registry of the process. Until
//! [`LoggingContext::init`] runs, events go to the default console sink; the
//! first `init()` replaces it with a single rotating file sink, later calls only
//! log that the context is already initialized.

use std::fs;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use chrono::Local;
use keywhiz_core_types::{Platform, SystemPlatform};
use keywhiz_errors::{KeywhizError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::LoggingConfig;
use crate::event::{Failure, LogEvent, Severity};
use crate::formatter::BriefFormatter;
use crate::layer::BriefLayer;
use crate::sink::{ConsoleSink, LogSink, RotatingFileSink};

/// Start line written right after the file sink is attached.
pub const START_MARKER: &str = ">>>>> Starting Keywhiz CLI... <<<<<";

/// Notice written by every `init()` after the first.
pub const ALREADY_INITIALIZED: &str = "Logger is already initialized!";

const CONTEXT_CLASS: &str = "keywhiz_logging::LoggingContext";

struct LoggingState {
    initialized: bool,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl LoggingState {
    fn publish(&self, line: &str) {
        for sink in &self.sinks {
            if let Err(err) = sink.publish(line) {
                eprintln!("keywhiz-logging: {} sink failed: {}", sink.name(), err);
            }
        }
    }
}

struct Shared {
    config: LoggingConfig,
    formatter: BriefFormatter,
    state: Mutex<LoggingState>,
}

/// Explicit logging context, constructed once at process start and passed by
/// reference (or cheap clone) to everything that logs.
#[derive(Clone)]
pub struct LoggingContext {
    shared: Arc<Shared>,
}

impl LoggingContext {
    /// Context for the running OS user, logging to stderr until initialized.
    pub fn new(config: LoggingConfig) -> Self {
        Self::with_platform(config, &SystemPlatform)
    }

    pub fn with_platform(config: LoggingConfig, platform: &dyn Platform) -> Self {
        Self::with_default_sink(
            config,
            BriefFormatter::for_platform(platform),
            Arc::new(ConsoleSink),
        )
    }

    /// Context whose pre-initialization output goes to `default_sink`.
    pub fn with_default_sink(
        config: LoggingConfig,
        formatter: BriefFormatter,
        default_sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                formatter,
                state: Mutex::new(LoggingState {
                    initialized: false,
                    sinks: vec![default_sink],
                }),
            }),
        }
    }

    pub fn config(&self) -> &LoggingConfig {
        &self.shared.config
    }

    pub fn formatter(&self) -> &BriefFormatter {
        &self.shared.formatter
    }

    pub fn is_initialized(&self) -> bool {
        self.lock_state().initialized
    }

    /// Names of the attached sinks, in attachment order.
    pub fn sink_names(&self) -> Vec<String> {
        self.lock_state()
            .sinks
            .iter()
            .map(|sink| sink.name().to_string())
            .collect()
    }

    /// Route all logging of this context into the rotating file sink.
    ///
    /// The first call creates the log directory, opens the file sink, detaches
    /// the default sink, optionally installs the global `tracing` subscriber
    /// and writes the start lines. The state lock is held throughout, so no
    /// caller observes `initialized` before the sink is attached. Later calls
    /// write a single notice line and change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`KeywhizError::LogDirectory`] or [`KeywhizError::LogFileOpen`]
    /// when the file sink cannot be set up, and
    /// [`KeywhizError::SubscriberInstall`] when another global subscriber is
    /// already installed. On error the default sink stays attached and the
    /// context stays uninitialized.
    pub fn init(&self) -> Result<()> {
        let mut state = self.lock_state();

        if state.initialized {
            self.publish_unfiltered(
                &state,
                &LogEvent::new(Severity::Info, CONTEXT_CLASS, "init", ALREADY_INITIALIZED),
            );
            return Ok(());
        }

        let config = &self.shared.config;
        fs::create_dir_all(&config.log_dir).map_err(|source| KeywhizError::LogDirectory {
            path: config.log_dir.clone(),
            source,
        })?;
        let file_sink = RotatingFileSink::open(
            &config.log_dir,
            &config.file_pattern,
            config.rotation_policy(),
        )?;

        if config.install_global {
            tracing_subscriber::registry()
                .with(self.layer().with_filter(
                    tracing::level_filters::LevelFilter::from(config.level),
                ))
                .try_init()
                .map_err(|err| KeywhizError::SubscriberInstall {
                    reason: err.to_string(),
                })?;
        }

        state.sinks.clear();
        state.sinks.push(Arc::new(file_sink));

        let notice = format!("Initialized the logger on {}", Local::now().to_rfc2822());
        for message in ["", START_MARKER, notice.as_str()] {
            self.publish_unfiltered(
                &state,
                &LogEvent::new(Severity::Info, CONTEXT_CLASS, "init", message),
            );
        }

        state.initialized = true;
        Ok(())
    }

    /// Format and publish one event to every attached sink.
    ///
    /// Events below the configured level are dropped. Sink failures are
    /// reported on stderr and never returned.
    pub fn publish(&self, event: &LogEvent) {
        let state = self.lock_state();
        self.publish_locked(&state, event);
    }

    pub fn flush(&self) {
        for sink in &self.lock_state().sinks {
            if let Err(err) = sink.flush() {
                eprintln!("keywhiz-logging: {} sink flush failed: {}", sink.name(), err);
            }
        }
    }

    /// Logger handle for one source class.
    pub fn logger(&self, class: impl Into<String>) -> Logger {
        Logger {
            context: self.clone(),
            class: class.into(),
        }
    }

    /// `tracing` layer publishing into this context.
    pub fn layer(&self) -> BriefLayer {
        BriefLayer::new(self.clone())
    }

    fn publish_locked(&self, state: &LoggingState, event: &LogEvent) {
        if event.severity < self.shared.config.level {
            return;
        }
        self.publish_unfiltered(state, event);
    }

    // Lines written by `init()` itself ignore the configured level.
    fn publish_unfiltered(&self, state: &LoggingState, event: &LogEvent) {
        state.publish(&self.shared.formatter.format(event));
    }

    fn lock_state(&self) -> MutexGuard<'_, LoggingState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle logging on behalf of a single source class.
#[derive(Clone)]
pub struct Logger {
    context: LoggingContext,
    class: String,
}

impl Logger {
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Log a template with positional `{n}` arguments.
    pub fn log<I, T>(&self, severity: Severity, method: &str, template: &str, args: I)
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.context.publish(
            &LogEvent::new(severity, self.class.as_str(), method, template).with_args(args),
        );
    }

    pub fn log_failure(&self, severity: Severity, method: &str, message: &str, failure: Failure) {
        self.context.publish(
            &LogEvent::new(severity, self.class.as_str(), method, message).with_failure(failure),
        );
    }

    pub fn info(&self, method: &str, message: &str) {
        self.plain(Severity::Info, method, message);
    }

    pub fn warning(&self, method: &str, message: &str) {
        self.plain(Severity::Warning, method, message);
    }

    pub fn severe(&self, method: &str, message: &str) {
        self.plain(Severity::Severe, method, message);
    }

    fn plain(&self, severity: Severity, method: &str, message: &str) {
        self.context
            .publish(&LogEvent::new(severity, self.class.as_str(), method, message));
    }
}

static GLOBAL: OnceLock<LoggingContext> = OnceLock::new();

/// Initialize the process-wide context for the current OS user.
///
/// Logs to `<home>/keywhiz-cli/log` and installs the global `tracing`
/// subscriber. Safe to call repeatedly; see [`LoggingContext::init`].
///
/// # Errors
///
/// Same as [`LoggingContext::init`], plus
/// [`KeywhizError::HomeDirectoryUnavailable`].
pub fn init() -> Result<&'static LoggingContext> {
    match GLOBAL.get() {
        Some(context) => {
            context.init()?;
            Ok(context)
        }
        None => init_with_config(
            LoggingConfig::for_platform(&SystemPlatform)?.with_install_global(true),
        ),
    }
}

/// Initialize the process-wide context with an explicit configuration.
///
/// Only the configuration of the first call is used; later calls return the
/// existing context and log the already-initialized notice.
///
/// # Errors
///
/// Same as [`LoggingContext::init`].
pub fn init_with_config(config: LoggingConfig) -> Result<&'static LoggingContext> {
    let context = GLOBAL.get_or_init(|| LoggingContext::new(config));
    context.init()?;
    Ok(context)
}

/// The process-wide context, if [`init`] or [`init_with_config`] has been
/// called.
pub fn global() -> Option<&'static LoggingContext> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MemorySink;
    use tempfile::TempDir;

    fn context(dir: &TempDir, default_sink: MemorySink) -> LoggingContext {
        LoggingContext::with_default_sink(
            LoggingConfig::new(dir.path().join("log")),
            BriefFormatter::new("tester"),
            Arc::new(default_sink),
        )
    }

    #[test]
    fn test_default_sink_before_init() {
        let dir = TempDir::new().unwrap();
        let console = MemorySink::new();
        let ctx = context(&dir, console.clone());

        ctx.logger("com.oneops.cli.Session").info("run", "before init");

        assert!(!ctx.is_initialized());
        assert_eq!(ctx.sink_names(), vec!["memory".to_string()]);
        console.assert_line_contains("[tester]");
        console.assert_line_contains("Session.run: before init");
    }

    #[test]
    fn test_init_detaches_default_sink() {
        let dir = TempDir::new().unwrap();
        let console = MemorySink::new();
        let ctx = context(&dir, console.clone());

        ctx.init().unwrap();
        ctx.logger("a.B").info("c", "after init");

        assert!(ctx.is_initialized());
        assert_eq!(ctx.sink_names(), vec!["rotating-file".to_string()]);
        assert!(console.lines().is_empty());
    }

    #[test]
    fn test_level_filter_drops_lower_severities() {
        let dir = TempDir::new().unwrap();
        let console = MemorySink::new();
        let ctx = LoggingContext::with_default_sink(
            LoggingConfig::new(dir.path()).with_level(Severity::Warning),
            BriefFormatter::new("tester"),
            Arc::new(console.clone()),
        );

        let logger = ctx.logger("a.B");
        logger.info("m", "dropped");
        logger.warning("m", "kept");

        assert_eq!(console.lines().len(), 1);
        console.assert_line_contains("(warning) B.m: kept");
    }
}
