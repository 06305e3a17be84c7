//! Rendering of log entries for the stock destinations
//!
//! - [`TimestampFormat`]: how the entry time is written
//! - [`OutputFormat`]: human-readable text or one JSON object per line

use super::log_entry::LogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// Time of day only: `10:30:45.123`
    TimeOnly,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_log_dispatcher::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// # let _ = format;
    /// ```
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::TimeOnly => datetime.format("%H:%M:%S%.3f").to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO   ] worker.rs do_work():42 - Request processed`
    #[default]
    Text,

    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","message":"Request processed",...}`
    Json,
}

impl OutputFormat {
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(entry, timestamp_format, entry.level.to_str()),
            OutputFormat::Json => format_json(entry, timestamp_format),
        }
    }
}

/// Text rendering with a caller-supplied level label (for colored output)
pub(crate) fn format_text(
    entry: &LogEntry,
    timestamp_format: &TimestampFormat,
    level_label: &str,
) -> String {
    let mut output = format!(
        "[{}] [{:7}] ",
        timestamp_format.format(&entry.timestamp),
        level_label
    );

    if !entry.thread.is_empty() {
        output.push_str(&format!("[{}] ", entry.thread));
    }

    output.push_str(&format!(
        "{} {}:{} - {}",
        entry.file_name(),
        entry.function,
        entry.line,
        entry.message
    ));

    if let Some(ref context) = entry.context {
        if !context.is_empty() {
            output.push_str(" | ");
            output.push_str(&context.format_fields());
        }
    }

    output
}

fn format_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut json_obj = serde_json::Map::new();

    let timestamp = if timestamp_format.is_numeric() {
        serde_json::Value::Number(entry.timestamp.timestamp_millis().into())
    } else {
        serde_json::Value::String(timestamp_format.format(&entry.timestamp))
    };
    json_obj.insert("timestamp".to_string(), timestamp);
    json_obj.insert(
        "level".to_string(),
        serde_json::Value::String(entry.level.to_str().to_string()),
    );
    json_obj.insert(
        "message".to_string(),
        serde_json::Value::String(entry.message.to_string()),
    );
    json_obj.insert(
        "thread".to_string(),
        serde_json::Value::String(entry.thread.to_string()),
    );
    json_obj.insert(
        "file".to_string(),
        serde_json::Value::String(entry.file.to_string()),
    );
    json_obj.insert(
        "function".to_string(),
        serde_json::Value::String(entry.function.to_string()),
    );
    json_obj.insert(
        "line".to_string(),
        serde_json::Value::Number(entry.line.into()),
    );

    if let Some(ref context) = entry.context {
        let fields = context
            .fields()
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json_value()))
            .collect();
        json_obj.insert("context".to_string(), serde_json::Value::Object(fields));
    }

    serde_json::Value::Object(json_obj).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogContext, LogLevel};
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456)
    }

    fn entry() -> LogEntry {
        let mut entry = LogEntry::new(LogLevel::Warning, "cache miss")
            .with_location("src/cache/lru.rs", "lookup()", 88)
            .with_thread("cache-worker");
        entry.timestamp = fixed_datetime();
        entry
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(
            TimestampFormat::Iso8601.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123Z"
        );
        assert_eq!(
            TimestampFormat::Iso8601Micros.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456Z"
        );
        assert_eq!(TimestampFormat::TimeOnly.format(&fixed_datetime()), "10:30:45.123");
        assert_eq!(
            TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string()).format(&fixed_datetime()),
            "2025/01/08 10:30"
        );
    }

    #[test]
    fn test_text_format() {
        let line = OutputFormat::Text.format(&entry(), &TimestampFormat::Iso8601);
        assert_eq!(
            line,
            "[2025-01-08T10:30:45.123Z] [WARNING] [cache-worker] lru.rs lookup():88 - cache miss"
        );
    }

    #[test]
    fn test_text_format_main_thread_and_context() {
        let entry = entry()
            .with_thread("")
            .with_context(LogContext::new().with_field("key", "k1"));
        let line = OutputFormat::Text.format(&entry, &TimestampFormat::TimeOnly);
        assert_eq!(line, "[10:30:45.123] [WARNING] lru.rs lookup():88 - cache miss | key=k1");
    }

    #[test]
    fn test_json_format() {
        let entry = entry().with_context(LogContext::new().with_field("hits", 3));
        let line = OutputFormat::Json.format(&entry, &TimestampFormat::UnixMillis);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["level"], "WARNING");
        assert_eq!(value["message"], "cache miss");
        assert_eq!(value["function"], "lookup()");
        assert_eq!(value["line"], 88);
        assert_eq!(value["context"]["hits"], 3);
        assert!(value["timestamp"].is_number());
    }
}
