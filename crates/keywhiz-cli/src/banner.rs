//! Startup banner

use colored::Colorize;

/// Inner width of the banner box.
pub const BANNER_WIDTH: usize = 60;

/// Packaging metadata shown in the banner, embedded at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub version: String,
    pub built_date: String,
}

impl PackageMetadata {
    /// Metadata of this build. `KEYWHIZ_BUILD_DATE` is optional at build time.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            built_date: option_env!("KEYWHIZ_BUILD_DATE")
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}

/// Pad `text` on both sides to `width` columns, extra column on the right.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Render the welcome box and the command hint below it.
pub fn banner(metadata: &PackageMetadata) -> String {
    let border = format!("+{}+", "-".repeat(BANNER_WIDTH));
    let title = center("Welcome to OneOps Keywhiz CLI", BANNER_WIDTH);
    let version = center(&format!("Version: {}", metadata.version), BANNER_WIDTH);
    let built = center(&format!("Built on {}", metadata.built_date), BANNER_WIDTH);

    format!(
        "{border}\n|{}|\n|{}|\n|{}|\n{border}\nType {} or {} for help, {} to exit.",
        title.cyan().bold(),
        version.bright_black(),
        built.bright_black(),
        "help".green(),
        "?".green(),
        "exit".green(),
    )
}
