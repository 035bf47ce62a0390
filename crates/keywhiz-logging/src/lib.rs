//! Logging facility for the Keywhiz CLI
//!
//! This crate provides:
//! - A compact one-line formatter (`BriefFormatter`)
//! - A size-rotated file sink with a fixed ring of generations
//! - An explicit `LoggingContext` with at-most-once initialization
//! - A `tracing` layer so `tracing` macros anywhere in the process end up in
//!   the same file
//!
//! # Usage
//!
//! ```no_run
//! use keywhiz_logging::{LoggingConfig, LoggingContext};
//!
//! let context = LoggingContext::new(LoggingConfig::new("/tmp/keywhiz-cli/log"));
//! context.init()?;
//! context.logger("keywhiz_cli::Session").info("run", "ready");
//! # Ok::<(), keywhiz_errors::KeywhizError>(())
//! ```

pub mod capture;
pub mod config;
pub mod event;
pub mod formatter;
pub mod init;
pub mod layer;
pub mod message;
pub mod sink;

pub use capture::MemorySink;
pub use config::LoggingConfig;
pub use event::{current_thread_id, Failure, LogEvent, Severity};
pub use formatter::{simple_class_name, BriefFormatter};
pub use init::{global, init, init_with_config, Logger, LoggingContext};
pub use layer::BriefLayer;
pub use sink::{ConsoleSink, LogSink, RotatingFileSink, RotationPolicy};
