//! Logging configuration.

use std::path::{Path, PathBuf};

use keywhiz_core_types::Platform;
use keywhiz_errors::{KeywhizError, Result};
use serde::{Deserialize, Serialize};

use crate::event::Severity;
use crate::sink::RotationPolicy;

/// Log directory relative to the user's home.
pub const LOG_DIR_UNDER_HOME: &str = "keywhiz-cli/log";

/// File name pattern; `%g` is the generation index.
pub const DEFAULT_FILE_PATTERN: &str = "OneOps-KeywhizCli-%g.log";

/// Size at which the active log file is rotated (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of generation files kept.
pub const DEFAULT_MAX_GENERATIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub file_pattern: String,
    pub max_file_bytes: u64,
    pub max_generations: usize,
    pub append: bool,
    /// Lowest severity that reaches the sinks.
    pub level: Severity,
    /// Install the process-global `tracing` subscriber during `init()`.
    pub install_global: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(LOG_DIR_UNDER_HOME),
            file_pattern: DEFAULT_FILE_PATTERN.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_generations: DEFAULT_MAX_GENERATIONS,
            append: true,
            level: Severity::Info,
            install_global: false,
        }
    }
}

impl LoggingConfig {
    /// Default configuration logging into `log_dir`.
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            ..Default::default()
        }
    }

    /// Default configuration logging under the platform home directory.
    ///
    /// # Errors
    ///
    /// Returns [`KeywhizError::HomeDirectoryUnavailable`] if the platform has no home.
    pub fn for_platform(platform: &dyn Platform) -> Result<Self> {
        let home = platform
            .user_home()
            .ok_or(KeywhizError::HomeDirectoryUnavailable)?;
        Ok(Self::new(log_dir_under(&home)))
    }

    #[must_use]
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    #[must_use]
    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    #[must_use]
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_install_global(mut self, install: bool) -> Self {
        self.install_global = install;
        self
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy {
            max_file_bytes: self.max_file_bytes,
            max_generations: self.max_generations,
            append: self.append,
        }
    }
}

/// `<home>/keywhiz-cli/log`
pub fn log_dir_under(home: &Path) -> PathBuf {
    home.join(LOG_DIR_UNDER_HOME)
}
