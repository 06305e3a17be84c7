//! Console destination implementation

use crate::core::format::format_text;
use crate::core::{
    Destination, DestinationConfig, DispatchQueue, LogEntry, LogLevel, OutputFormat, Result,
    TimestampFormat,
};
use colored::Colorize;
use std::io::Write;

pub struct ConsoleDestination {
    config: DestinationConfig,
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    queue: DispatchQueue,
}

impl ConsoleDestination {
    pub fn new() -> Result<Self> {
        Self::with_config(DestinationConfig::default())
    }

    pub fn with_config(config: DestinationConfig) -> Result<Self> {
        let queue = config.build_queue("console")?;
        Ok(Self {
            config,
            use_colors: true,
            timestamp_format: TimestampFormat::TimeOnly,
            output_format: OutputFormat::default(),
            queue,
        })
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the output format for this destination
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatcher::destinations::ConsoleDestination;
    /// use rust_log_dispatcher::core::OutputFormat;
    ///
    /// let console = ConsoleDestination::new()
    ///     .unwrap()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, entry: &LogEntry) -> String {
        match self.output_format {
            OutputFormat::Text if self.use_colors => {
                let level = format!("{:7}", entry.level.to_str())
                    .color(entry.level.color_code())
                    .to_string();
                format_text(entry, &self.timestamp_format, &level)
            }
            format => format.format(entry, &self.timestamp_format),
        }
    }
}

impl Destination for ConsoleDestination {
    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> LogLevel {
        self.config.min_level
    }

    fn is_asynchronous(&self) -> bool {
        self.config.asynchronous
    }

    fn has_message_filters(&self) -> bool {
        self.config.has_message_filters()
    }

    fn should_log(&self, level: LogLevel, path: &str, function: &str, message: Option<&str>) -> bool {
        self.config.accepts(level, path, function, message)
    }

    fn deliver(&self, entry: &LogEntry) -> bool {
        let output = self.render(entry);

        // Errors go to stderr, everything else to stdout
        let written = match entry.level {
            LogLevel::Error => writeln!(std::io::stderr().lock(), "{}", output),
            _ => writeln!(std::io::stdout().lock(), "{}", output),
        };

        match written {
            Ok(()) => true,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Console destination failed: {}", e);
                false
            }
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }

    fn queue(&self) -> Option<&DispatchQueue> {
        Some(&self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_render() {
        let console = ConsoleDestination::new().unwrap().with_colors(false);
        let entry = LogEntry::new(LogLevel::Info, "hello").with_location("src/main.rs", "main()", 3);

        let line = console.render(&entry);
        assert!(line.ends_with("[INFO   ] main.rs main():3 - hello"), "got {}", line);
    }

    #[test]
    fn test_json_render() {
        let console = ConsoleDestination::new()
            .unwrap()
            .with_output_format(OutputFormat::Json);
        let line = console.render(&LogEntry::new(LogLevel::Error, "boom"));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["level"], "ERROR");
    }

    #[test]
    fn test_deliver_reports_success() {
        let console = ConsoleDestination::new().unwrap();
        assert!(console.deliver(&LogEntry::new(LogLevel::Debug, "to stdout")));
    }
}
