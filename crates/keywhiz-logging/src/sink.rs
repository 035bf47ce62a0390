//! Log sinks: destinations for formatted lines.
//!
//! [`ConsoleSink`] is the default sink used until the logging context is
//! initialized; [`RotatingFileSink`] is the size-rotated file that replaces it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use keywhiz_errors::{KeywhizError, Result};

/// Token in a file pattern replaced by the generation index.
pub const GENERATION_TOKEN: &str = "%g";

/// Destination for formatted log lines.
pub trait LogSink: Send + Sync {
    /// Short, stable name used in diagnostics.
    fn name(&self) -> &str;

    fn publish(&self, line: &str) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes lines to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn publish(&self, line: &str) -> io::Result<()> {
        io::stderr().lock().write_all(line.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Size limit and retention of a rotating file sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Bytes after which the active generation is rotated; `0` disables rotation.
    pub max_file_bytes: u64,
    /// Number of generation files kept, including the active one.
    pub max_generations: usize,
    /// Append to an existing generation 0 on open instead of truncating it.
    pub append: bool,
}

struct ActiveFile {
    file: Option<File>,
    written: u64,
}

/// File sink rotating through a fixed ring of numbered generations.
///
/// Generation 0 is always the active file. When it reaches the size limit,
/// every generation is shifted up by one, the one pushed past the retention
/// count is deleted, and a fresh generation 0 is opened.
pub struct RotatingFileSink {
    dir: PathBuf,
    file_pattern: String,
    policy: RotationPolicy,
    active: Mutex<ActiveFile>,
}

impl RotatingFileSink {
    /// Open generation 0 of `file_pattern` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`KeywhizError::LogFileOpen`] if the active file cannot be opened.
    pub fn open(dir: impl Into<PathBuf>, file_pattern: &str, policy: RotationPolicy) -> Result<Self> {
        let policy = RotationPolicy {
            max_generations: policy.max_generations.max(1),
            ..policy
        };
        let file_pattern = if policy.max_generations > 1 && !file_pattern.contains(GENERATION_TOKEN)
        {
            format!("{file_pattern}.{GENERATION_TOKEN}")
        } else {
            file_pattern.to_string()
        };

        let sink = Self {
            dir: dir.into(),
            file_pattern,
            policy,
            active: Mutex::new(ActiveFile {
                file: None,
                written: 0,
            }),
        };

        let path = sink.active_path();
        let active = open_generation(&path, policy.append).map_err(|source| {
            KeywhizError::LogFileOpen {
                path: path.clone(),
                source,
            }
        })?;
        *sink.active.lock().unwrap_or_else(PoisonError::into_inner) = active;

        Ok(sink)
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a generation file.
    pub fn generation_path(&self, generation: usize) -> PathBuf {
        self.dir.join(
            self.file_pattern
                .replace(GENERATION_TOKEN, &generation.to_string()),
        )
    }

    pub fn active_path(&self) -> PathBuf {
        self.generation_path(0)
    }

    /// Generation files currently present on disk, oldest last.
    pub fn existing_generations(&self) -> Vec<PathBuf> {
        (0..self.policy.max_generations)
            .map(|generation| self.generation_path(generation))
            .filter(|path| path.exists())
            .collect()
    }

    fn rotate(&self, active: &mut ActiveFile) -> io::Result<()> {
        // Close before renaming so the shift also works where open files are locked.
        active.file = None;

        for generation in (0..self.policy.max_generations - 1).rev() {
            let from = self.generation_path(generation);
            let to = self.generation_path(generation + 1);
            if from.exists() {
                if to.exists() {
                    fs::remove_file(&to)?;
                }
                fs::rename(&from, &to)?;
            }
        }

        *active = open_generation(&self.active_path(), false)?;
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFileSink")
            .field("dir", &self.dir)
            .field("file_pattern", &self.file_pattern)
            .field("policy", &self.policy)
            .finish()
    }
}

impl LogSink for RotatingFileSink {
    fn name(&self) -> &str {
        "rotating-file"
    }

    fn publish(&self, line: &str) -> io::Result<()> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        let file = active
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is closed after a failed rotation"))?;

        file.write_all(line.as_bytes())?;
        file.flush()?;
        active.written += line.len() as u64;

        if self.policy.max_file_bytes > 0 && active.written >= self.policy.max_file_bytes {
            self.rotate(&mut active)?;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_generation(path: &Path, append: bool) -> io::Result<ActiveFile> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    let written = if append { file.metadata()?.len() } else { 0 };
    Ok(ActiveFile {
        file: Some(file),
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn policy(max_file_bytes: u64, max_generations: usize) -> RotationPolicy {
        RotationPolicy {
            max_file_bytes,
            max_generations,
            append: true,
        }
    }

    #[test]
    fn test_generation_path_substitutes_index() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app-%g.log", policy(0, 2)).unwrap();

        assert_eq!(sink.generation_path(1), dir.path().join("app-1.log"));
        assert_eq!(sink.active_path(), dir.path().join("app-0.log"));
        assert!(sink.active_path().exists());
    }

    #[test]
    fn test_pattern_without_token_gets_suffix() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app.log", policy(0, 3)).unwrap();

        assert_eq!(sink.active_path(), dir.path().join("app.log.0"));
    }

    #[test]
    fn test_append_keeps_existing_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app-0.log"), "earlier\n").unwrap();

        let sink = RotatingFileSink::open(dir.path(), "app-%g.log", policy(0, 2)).unwrap();
        sink.publish("later\n").unwrap();

        let content = fs::read_to_string(sink.active_path()).unwrap();
        assert_eq!(content, "earlier\nlater\n");
    }

    #[test]
    fn test_truncate_when_not_appending() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app-0.log"), "earlier\n").unwrap();

        let sink = RotatingFileSink::open(
            dir.path(),
            "app-%g.log",
            RotationPolicy {
                append: false,
                ..policy(0, 2)
            },
        )
        .unwrap();
        sink.publish("fresh\n").unwrap();

        let content = fs::read_to_string(sink.active_path()).unwrap();
        assert_eq!(content, "fresh\n");
    }

    #[test]
    fn test_single_generation_truncates_on_rotation() {
        let dir = TempDir::new().unwrap();
        let sink = RotatingFileSink::open(dir.path(), "app-%g.log", policy(10, 1)).unwrap();

        sink.publish("0123456789\n").unwrap();
        sink.publish("next\n").unwrap();

        assert_eq!(sink.existing_generations().len(), 1);
        assert_eq!(fs::read_to_string(sink.active_path()).unwrap(), "next\n");
    }

    #[test]
    fn test_open_fails_for_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = RotatingFileSink::open(&missing, "app-%g.log", policy(0, 2)).unwrap_err();
        assert!(matches!(err, KeywhizError::LogFileOpen { .. }));
    }
}
