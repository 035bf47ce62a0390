//! In-memory sink for deterministic logging assertions.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use crate::sink::LogSink;

/// Sink that keeps every published line in memory.
///
/// Clones share the same buffer, so a test can hand one clone to a logging
/// context and inspect the other.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all captured lines
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the captured lines joined into one string
    pub fn contents(&self) -> String {
        self.lines().concat()
    }

    /// Count lines matching a predicate
    pub fn count_lines<F>(&self, predicate: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.lines().iter().filter(|l| predicate(l)).count()
    }

    /// Assert that some captured line contains `needle`
    ///
    /// # Panics
    ///
    /// Panics if no line matches
    pub fn assert_line_contains(&self, needle: &str) {
        let lines = self.lines();
        assert!(
            lines.iter().any(|l| l.contains(needle)),
            "Expected a line containing {:?} in {} captured lines",
            needle,
            lines.len()
        );
    }

    /// Clear all captured lines
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn publish(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::new();
        let other = sink.clone();

        other.publish("one\n").unwrap();
        other.publish("two\n").unwrap();

        assert_eq!(sink.lines().len(), 2);
        assert_eq!(sink.contents(), "one\ntwo\n");
        assert_eq!(sink.count_lines(|l| l.starts_with('t')), 1);
    }

    #[test]
    #[should_panic(expected = "Expected a line containing")]
    fn test_assert_line_contains_fails() {
        MemorySink::new().assert_line_contains("missing");
    }

    #[test]
    fn test_lines_survive_poisoned_lock() {
        let sink = MemorySink::new();
        sink.publish("kept\n").unwrap();

        let shared = sink.lines.clone();
        let _ = std::thread::spawn(move || {
            let _guard = shared.lock().unwrap();
            panic!("writer died holding the buffer");
        })
        .join();

        sink.publish("after\n").unwrap();
        assert_eq!(sink.lines(), vec!["kept\n".to_string(), "after\n".to_string()]);
    }

    #[test]
    fn test_clear() {
        let sink = MemorySink::new();
        sink.publish("x\n").unwrap();
        sink.clear();
        assert!(sink.lines().is_empty());
    }
}
