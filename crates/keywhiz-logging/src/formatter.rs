//! Compact single-line log formatter.
//!
//! Every event becomes
//!
//! ```text
//! HH:mm:ss [user] threadId marker Class.method: message
//! <stack trace, if a failure is attached>
//! ```
//!
//! where the marker (and the space after it) is only present for warnings and
//! errors.

use keywhiz_core_types::Platform;

use crate::event::LogEvent;
use crate::message;

/// Time-of-day pattern of the line prefix.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Formats [`LogEvent`]s into compact lines.
///
/// The user name is captured once at construction; formatting itself reads
/// nothing but the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefFormatter {
    user: String,
}

impl BriefFormatter {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }

    pub fn for_platform(platform: &dyn Platform) -> Self {
        Self::new(platform.user())
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn format(&self, event: &LogEvent) -> String {
        let marker = event.severity.marker();
        let marker_sep = if marker.is_empty() { "" } else { " " };
        let rendered = message::render_opt(&event.message, event.args.as_deref());
        let trailing = event
            .failure
            .as_ref()
            .map(|failure| failure.render())
            .unwrap_or_default();

        format!(
            "{time} [{user}] {thread} {marker}{marker_sep}{class}.{method}: {rendered}\n{trailing}",
            time = event.timestamp.format(TIME_FORMAT),
            user = self.user,
            thread = event.thread_id,
            class = simple_class_name(&event.source_class),
            method = event.source_method,
        )
    }
}

/// Derive the simple class name from a qualified source name.
///
/// Everything from the first `$` on is dropped; of the remainder the part after
/// the last package separator (`.` or `::`) is kept. A name without separators
/// is returned whole.
pub fn simple_class_name(qualified: &str) -> &str {
    let head = match qualified.find('$') {
        Some(nested) => &qualified[..nested],
        None => qualified,
    };
    match head.rfind(|c: char| c == '.' || c == ':') {
        Some(sep) => &head[sep + 1..],
        None => head,
    }
}
