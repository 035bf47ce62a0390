//! Error facility for the Keywhiz CLI
//!
//! Provides the canonical error type shared by the CLI crates together with a
//! stable kind/code taxonomy for programmatic handling and tests.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using KeywhizError
pub type Result<T> = std::result::Result<T, KeywhizError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match on
/// without depending on message wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Filesystem or stream failure
    Io,
    /// Caller supplied a value outside the accepted set
    InvalidInput,
    /// Process-wide facility could not be set up
    Internal,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Io => "ERR_IO",
            ErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Error taxonomy for Keywhiz CLI operations
#[derive(Error, Debug)]
pub enum KeywhizError {
    /// The log directory could not be created
    #[error("Failed to create log directory {}", .path.display())]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A log file generation could not be opened
    #[error("Failed to open log file {}", .path.display())]
    LogFileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The process-global tracing subscriber could not be installed
    #[error("Failed to install log subscriber: {reason}")]
    SubscriberInstall { reason: String },

    /// The platform did not report a home directory
    #[error("Home directory could not be resolved")]
    HomeDirectoryUnavailable,

    /// Name does not match any auth domain
    #[error("Unknown auth domain: {name}")]
    UnknownAuthDomain { name: String },
}

impl KeywhizError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            KeywhizError::LogDirectory { .. }
            | KeywhizError::LogFileOpen { .. }
            | KeywhizError::HomeDirectoryUnavailable => ErrorKind::Io,
            KeywhizError::SubscriberInstall { .. } => ErrorKind::Internal,
            KeywhizError::UnknownAuthDomain { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}
