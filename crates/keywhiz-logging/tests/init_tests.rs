#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::backtrace::Backtrace;
use std::sync::{Arc, Barrier};

use keywhiz_core_types::StaticPlatform;
use keywhiz_errors::{ErrorKind, KeywhizError};
use keywhiz_logging::init::{ALREADY_INITIALIZED, START_MARKER};
use keywhiz_logging::{Failure, LoggingConfig, LoggingContext, Severity};
use tempfile::TempDir;

fn active_log(log_dir: &Path) -> String {
    fs::read_to_string(log_dir.join("OneOps-KeywhizCli-0.log")).unwrap()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.lines().filter(|l| l.contains(needle)).count()
}

fn context(log_dir: &Path) -> LoggingContext {
    LoggingContext::with_platform(
        LoggingConfig::new(log_dir),
        &StaticPlatform::new("alice", "/home/alice"),
    )
}

#[test]
fn test_init_creates_directory_and_writes_start_lines() {
    let temp = TempDir::new().unwrap();
    let log_dir = temp.path().join("keywhiz-cli").join("log");
    let ctx = context(&log_dir);

    ctx.init().unwrap();

    assert!(log_dir.is_dir());
    let content = active_log(&log_dir);
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(" [alice] "));
    assert!(lines[0].ends_with("LoggingContext.init: "));
    assert!(lines[1].ends_with(&format!("LoggingContext.init: {}", START_MARKER)));
    assert!(lines[2].contains("LoggingContext.init: Initialized the logger on "));
}

#[test]
fn test_second_init_only_logs_notice() {
    let temp = TempDir::new().unwrap();
    let ctx = context(temp.path());

    ctx.init().unwrap();
    assert!(ctx.is_initialized());
    assert_eq!(ctx.sink_names(), vec!["rotating-file".to_string()]);

    ctx.init().unwrap();

    assert!(ctx.is_initialized());
    assert_eq!(ctx.sink_names(), vec!["rotating-file".to_string()]);
    let content = active_log(temp.path());
    assert_eq!(count(&content, ALREADY_INITIALIZED), 1);
    assert_eq!(count(&content, START_MARKER), 1);
}

#[test]
fn test_concurrent_first_init_attaches_one_sink() {
    let temp = TempDir::new().unwrap();
    let ctx = context(temp.path());
    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));

    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let ctx = ctx.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                ctx.init()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(ctx.sink_names(), vec!["rotating-file".to_string()]);
    let content = active_log(temp.path());
    assert_eq!(count(&content, START_MARKER), 1);
    assert_eq!(count(&content, ALREADY_INITIALIZED), callers - 1);

    let log_files = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(log_files, 1);
}

#[test]
fn test_uncreatable_directory_is_fatal() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let ctx = context(&blocker.join("log"));

    let err = ctx.init().unwrap_err();

    assert!(matches!(err, KeywhizError::LogDirectory { .. }));
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!ctx.is_initialized());
    assert_eq!(ctx.sink_names(), vec!["console".to_string()]);
}

#[test]
fn test_existing_log_is_appended() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("OneOps-KeywhizCli-0.log"), "previous run\n").unwrap();

    context(temp.path()).init().unwrap();

    let content = active_log(temp.path());
    assert!(content.starts_with("previous run\n"));
    assert_eq!(count(&content, START_MARKER), 1);
}

#[test]
fn test_logger_writes_through_file_sink() {
    let temp = TempDir::new().unwrap();
    let ctx = context(temp.path());
    ctx.init().unwrap();

    let logger = ctx.logger("com.oneops.cli.Session$Worker");
    logger.log(Severity::Warning, "run", "Retry {0} of {1}", [3, 5]);
    logger.severe("run", "gave up");

    let content = active_log(temp.path());
    assert_eq!(count(&content, "(warning) Session.run: Retry 3 of 5"), 1);
    assert_eq!(count(&content, "**ERROR** Session.run: gave up"), 1);
}

#[test]
fn test_init_lines_ignore_configured_level() {
    let temp = TempDir::new().unwrap();
    let ctx = LoggingContext::with_platform(
        LoggingConfig::new(temp.path()).with_level(Severity::Warning),
        &StaticPlatform::new("alice", "/home/alice"),
    );

    ctx.init().unwrap();
    ctx.init().unwrap();
    ctx.logger("a.B").info("m", "below level");

    let content = active_log(temp.path());
    assert_eq!(count(&content, START_MARKER), 1);
    assert_eq!(count(&content, "Initialized the logger on "), 1);
    assert_eq!(count(&content, ALREADY_INITIALIZED), 1);
    assert_eq!(count(&content, "below level"), 0);
}

#[test]
fn test_log_failure_writes_stack_trace_block() {
    let temp = TempDir::new().unwrap();
    let ctx = context(temp.path());
    ctx.init().unwrap();

    let cause = Failure::new("java.io.IOException", "disk full")
        .with_frames(["java.io.FileOutputStream.write(FileOutputStream.java:326)"]);
    let failure = Failure::new("com.oneops.cli.SyncException", "sync aborted")
        .with_backtrace(&Backtrace::force_capture())
        .with_cause(cause);

    ctx.logger("com.oneops.cli.Sync")
        .log_failure(Severity::Severe, "push", "Push failed", failure);

    let content = active_log(temp.path());
    let block: Vec<_> = content
        .lines()
        .skip_while(|l| !l.contains("**ERROR** Sync.push: Push failed"))
        .collect();
    assert!(!block.is_empty(), "missing failure line in {content}");
    assert_eq!(block[1], "com.oneops.cli.SyncException: sync aborted");
    assert!(block[2].starts_with("\tat "));
    assert!(block.contains(&"Caused by: java.io.IOException: disk full"));
    assert!(block.contains(&"\tat java.io.FileOutputStream.write(FileOutputStream.java:326)"));
}
