//! In-memory destination that captures entries for inspection

use crate::core::{
    Destination, DestinationConfig, DispatchQueue, LogEntry, LogLevel, Result,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keeps every delivered [`LogEntry`] in memory
///
/// Useful in tests and for surfacing recent log lines inside an
/// application. Optionally keeps only the newest `capacity` entries.
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let memory = Arc::new(
///     MemoryDestination::with_config(DestinationConfig::new().synchronous()).unwrap(),
/// );
/// let logger = Logger::builder().destination(memory.clone()).build();
///
/// logger.info(|| "stored", None, call_site!(), None);
/// assert_eq!(memory.messages(), vec!["stored".to_string()]);
/// ```
pub struct MemoryDestination {
    config: DestinationConfig,
    entries: Mutex<Vec<LogEntry>>,
    capacity: Option<usize>,
    flushes: AtomicU64,
    queue: DispatchQueue,
}

impl MemoryDestination {
    pub fn new() -> Result<Self> {
        Self::with_config(DestinationConfig::default())
    }

    pub fn with_config(config: DestinationConfig) -> Result<Self> {
        let queue = config.build_queue("memory")?;
        Ok(Self {
            config,
            entries: Mutex::new(Vec::new()),
            capacity: None,
            flushes: AtomicU64::new(0),
            queue,
        })
    }

    /// Keep at most `capacity` entries, discarding the oldest
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of completed [`Destination::flush`] calls
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }
}

impl Destination for MemoryDestination {
    fn name(&self) -> &str {
        "memory"
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
        let mut entries = self.entries.lock();
        entries.push(entry.clone());
        if let Some(capacity) = self.capacity {
            let excess = entries.len().saturating_sub(capacity);
            entries.drain(..excess);
        }
        true
    }

    fn flush(&self) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
    }

    fn queue(&self) -> Option<&DispatchQueue> {
        Some(&self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_keeps_newest() {
        let memory = MemoryDestination::new().unwrap().with_capacity(2);
        for text in ["a", "b", "c"] {
            memory.deliver(&LogEntry::new(LogLevel::Info, text));
        }
        assert_eq!(memory.messages(), vec!["b", "c"]);
    }

    #[test]
    fn test_uses_config() {
        let memory = MemoryDestination::with_config(
            DestinationConfig::new()
                .min_level(LogLevel::Warning)
                .synchronous(),
        )
        .unwrap();

        assert!(!memory.is_asynchronous());
        assert!(!memory.should_log(LogLevel::Info, "a.rs", "f", None));
        assert!(memory.should_log(LogLevel::Error, "a.rs", "f", None));
    }

    #[test]
    fn test_flush_counts() {
        let memory = MemoryDestination::new().unwrap();
        memory.flush();
        assert_eq!(memory.flush_count(), 1);
    }

    #[test]
    fn test_concurrent_flush_counts() {
        let memory = std::sync::Arc::new(MemoryDestination::new().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let memory = std::sync::Arc::clone(&memory);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        memory.flush();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(memory.flush_count(), 1000);
    }
}
