//! Log entry handed to destinations

use super::log_context::LogContext;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A fully resolved log event, as one destination receives it
///
/// Text fields are shared between all destinations of a dispatch pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: Arc<str>,
    pub timestamp: DateTime<Utc>,
    /// Calling thread label; empty on the main thread
    pub thread: Arc<str>,
    pub file: Arc<str>,
    /// Function name with its parameter list stripped
    pub function: Arc<str>,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<Arc<LogContext>>,
}

impl LogEntry {
    /// Build an entry stamped with the current time, without location data
    pub fn new(level: LogLevel, message: impl Into<Arc<str>>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            thread: Arc::from(""),
            file: Arc::from(""),
            function: Arc::from(""),
            line: 0,
            context: None,
        }
    }

    pub fn with_location(
        mut self,
        file: impl Into<Arc<str>>,
        function: impl Into<Arc<str>>,
        line: u32,
    ) -> Self {
        self.file = file.into();
        self.function = function.into();
        self.line = line;
        self
    }

    pub fn with_thread(mut self, thread: impl Into<Arc<str>>) -> Self {
        self.thread = thread.into();
        self
    }

    pub fn with_context(mut self, context: LogContext) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    /// File name without its directory
    pub fn file_name(&self) -> &str {
        self.file.rsplit(['/', '\\']).next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let entry = LogEntry::new(LogLevel::Warning, "disk almost full")
            .with_location("src/storage/disk.rs", "check()", 17)
            .with_thread("io")
            .with_context(LogContext::new().with_field("free_mb", 12));

        assert_eq!(&*entry.message, "disk almost full");
        assert_eq!(entry.file_name(), "disk.rs");
        assert_eq!(&*entry.thread, "io");
        assert_eq!(entry.line, 17);
        assert!(entry.context.is_some());
    }

    #[test]
    fn test_json_omits_missing_context() {
        let entry = LogEntry::new(LogLevel::Info, "plain");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("context"));
        assert!(json.contains("\"message\":\"plain\""));
    }
}
