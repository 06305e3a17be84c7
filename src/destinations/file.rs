//! File destination implementation

use crate::core::{
    Destination, DestinationConfig, DispatchQueue, LogEntry, LogLevel, LoggerError, OutputFormat,
    Result, TimestampFormat,
};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per entry to a file
///
/// Writes are buffered; [`Destination::flush`] (and therefore
/// [`Logger::flush`](crate::Logger::flush)) pushes them to disk.
pub struct FileDestination {
    config: DestinationConfig,
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    queue: DispatchQueue,
}

impl FileDestination {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(path, DestinationConfig::default())
    }

    pub fn with_config(path: impl Into<PathBuf>, config: DestinationConfig) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;
        let queue = config.build_queue(format!("file:{}", path.display()))?;

        Ok(Self {
            config,
            path,
            writer: Mutex::new(BufWriter::new(file)),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
            queue,
        })
    }

    /// Set the timestamp format for this destination
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_log_dispatcher::destinations::FileDestination;
    /// use rust_log_dispatcher::core::TimestampFormat;
    ///
    /// let file = FileDestination::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Write JSON lines instead of text
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let line = self.output_format.format(entry, &self.timestamp_format);
        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        Ok(())
    }
}

impl Destination for FileDestination {
    fn name(&self) -> &str {
        "file"
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
        match self.write_entry(entry) {
            Ok(()) => true,
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] File destination '{}' failed: {}",
                    self.path.display(),
                    e
                );
                false
            }
        }
    }

    fn flush(&self) {
        if let Err(e) = self.writer.lock().flush() {
            eprintln!(
                "[LOGGER ERROR] Failed to flush '{}': {}",
                self.path.display(),
                e
            );
        }
    }

    fn queue(&self) -> Option<&DispatchQueue> {
        Some(&self.queue)
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        let _ = self.writer.get_mut().flush();
    }
}
