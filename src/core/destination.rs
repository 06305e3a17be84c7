//! Destination trait for log output sinks

use super::{
    filter::{filters_accept, Filter, FilterTarget},
    log_entry::LogEntry,
    log_level::LogLevel,
    queue::{DispatchQueue, QueueConfig},
};

/// An output sink registered with a [`Logger`](crate::Logger)
///
/// The dispatcher asks [`should_log`](Destination::should_log) first and,
/// if accepted, runs [`deliver`](Destination::deliver) on the destination's
/// own [`DispatchQueue`]: queued for asynchronous destinations, waited for
/// otherwise. A destination whose [`queue`](Destination::queue) is `None`
/// or closed is skipped.
///
/// Registry membership is by identity: two handles are the same
/// destination only if they point at the same allocation.
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use rust_log_dispatcher::DispatchQueue;
///
/// struct Stdout {
///     queue: DispatchQueue,
/// }
///
/// impl Destination for Stdout {
///     fn name(&self) -> &str {
///         "stdout"
///     }
///
///     fn min_level(&self) -> LogLevel {
///         LogLevel::Info
///     }
///
///     fn deliver(&self, entry: &LogEntry) -> bool {
///         println!("{} {}", entry.level, entry.message);
///         true
///     }
///
///     fn queue(&self) -> Option<&DispatchQueue> {
///         Some(&self.queue)
///     }
/// }
/// ```
pub trait Destination: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn min_level(&self) -> LogLevel;

    /// Whether delivery may complete after the log call returns
    fn is_asynchronous(&self) -> bool {
        true
    }

    /// Whether [`should_log`](Destination::should_log) needs the message text
    fn has_message_filters(&self) -> bool {
        false
    }

    /// Decide whether to take an event
    ///
    /// `message` is `Some` whenever [`has_message_filters`](Destination::has_message_filters)
    /// is true; otherwise it may be `None`. Must be free of side effects.
    fn should_log(
        &self,
        level: LogLevel,
        _path: &str,
        _function: &str,
        _message: Option<&str>,
    ) -> bool {
        level >= self.min_level()
    }

    /// Write one entry; runs on the destination's queue
    fn deliver(&self, entry: &LogEntry) -> bool;

    /// Drain anything buffered inside the destination; runs on its queue
    fn flush(&self) {}

    fn queue(&self) -> Option<&DispatchQueue>;
}

/// Shared settings for the stock destinations
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use rust_log_dispatcher::core::{Comparison, Filter};
///
/// let config = DestinationConfig::new()
///     .min_level(LogLevel::Debug)
///     .synchronous()
///     .filter(Filter::message(Comparison::Contains, ["heartbeat"]).excluding());
///
/// assert!(config.has_message_filters());
/// assert!(!config.asynchronous);
/// ```
#[derive(Debug, Clone)]
pub struct DestinationConfig {
    pub min_level: LogLevel,
    pub asynchronous: bool,
    pub filters: Vec<Filter>,
    pub queue: QueueConfig,
}

impl DestinationConfig {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Verbose,
            asynchronous: true,
            filters: Vec::new(),
            queue: QueueConfig::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    /// Block log calls until this destination has written the entry
    #[must_use = "builder methods return a new value"]
    pub fn synchronous(self) -> Self {
        self.asynchronous(false)
    }

    #[must_use = "builder methods return a new value"]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue(mut self, queue: QueueConfig) -> Self {
        self.queue = queue;
        self
    }

    pub fn has_message_filters(&self) -> bool {
        self.filters
            .iter()
            .any(|f| f.target() == FilterTarget::Message)
    }

    /// Level check followed by the filter set
    pub fn accepts(
        &self,
        level: LogLevel,
        path: &str,
        function: &str,
        message: Option<&str>,
    ) -> bool {
        level >= self.min_level && filters_accept(&self.filters, level, path, function, message)
    }

    /// Start the queue described by this config
    pub fn build_queue(&self, label: impl Into<String>) -> super::error::Result<DispatchQueue> {
        DispatchQueue::with_config(label, self.queue.clone())
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::Comparison;

    #[test]
    fn test_defaults() {
        let config = DestinationConfig::default();
        assert_eq!(config.min_level, LogLevel::Verbose);
        assert!(config.asynchronous);
        assert!(!config.has_message_filters());
    }

    #[test]
    fn test_accepts_checks_level_first() {
        let config = DestinationConfig::new().min_level(LogLevel::Warning);
        assert!(!config.accepts(LogLevel::Info, "a.rs", "f", None));
        assert!(config.accepts(LogLevel::Error, "a.rs", "f", None));
    }

    #[test]
    fn test_path_filter_does_not_need_message() {
        let config = DestinationConfig::new()
            .filter(Filter::path(Comparison::EndsWith, ["a.rs"]).required());
        assert!(!config.has_message_filters());
        assert!(config.accepts(LogLevel::Info, "src/a.rs", "f", None));
    }
}
