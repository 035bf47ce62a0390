//! Platform queries: current user name and home directory.
//! Injected as a trait so tests and other shells control what the logger sees.

use std::path::PathBuf;

/// User name reported when the platform exposes none
pub const UNKNOWN_USER: &str = "unknown";

/// Source of the current user identity and home directory.
pub trait Platform: Send + Sync {
    fn user(&self) -> String;
    fn user_home(&self) -> Option<PathBuf>;
}

/// Platform backed by the running operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemPlatform;

impl Platform for SystemPlatform {
    fn user(&self) -> String {
        ["USER", "USERNAME", "LOGNAME"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    fn user_home(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// Platform with fixed answers.
#[derive(Debug, Clone)]
pub struct StaticPlatform {
    pub user: String,
    pub home: Option<PathBuf>,
}

impl StaticPlatform {
    pub fn new(user: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            home: Some(home.into()),
        }
    }
}

impl Platform for StaticPlatform {
    fn user(&self) -> String {
        self.user.clone()
    }

    fn user_home(&self) -> Option<PathBuf> {
        self.home.clone()
    }
}
