//! Dispatcher: fans each log call out to the registered destinations

use super::{
    call_site::{strip_params, thread_label, CallSite},
    destination::Destination,
    error::LoggerError,
    log_context::LogContext,
    log_entry::LogEntry,
    log_event::{LazyMessage, LogEvent},
    log_level::LogLevel,
    metrics::DispatchMetrics,
    registry::DestinationRegistry,
};
use chrono::Utc;
use crossbeam_channel::unbounded;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;
use std::time::{Duration, Instant};

pub struct Logger {
    registry: Arc<DestinationRegistry>,
    logs_sensitive: AtomicBool,
    /// Thread labelled `""`; `None` falls back to the std thread named "main"
    main_thread: Option<ThreadId>,
    metrics: Arc<DispatchMetrics>,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(DestinationRegistry::new()))
    }

    /// Create a logger over an existing, possibly shared, registry
    #[must_use]
    pub fn with_registry(registry: Arc<DestinationRegistry>) -> Self {
        Self {
            registry,
            logs_sensitive: AtomicBool::new(false),
            main_thread: None,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_log_dispatcher::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let memory = Arc::new(MemoryDestination::new().unwrap());
    /// let logger = Logger::builder()
    ///     .logs_sensitive(true)
    ///     .destination(memory.clone())
    ///     .build();
    ///
    /// assert_eq!(logger.count_destinations(), 1);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn registry(&self) -> &Arc<DestinationRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Returns `false` if the destination is already registered
    pub fn add_destination(&self, destination: Arc<dyn Destination>) -> bool {
        self.registry.add(destination)
    }

    /// Returns `false` if the destination was not registered
    pub fn remove_destination<D: Destination + ?Sized>(&self, destination: &Arc<D>) -> bool {
        self.registry.remove(destination)
    }

    pub fn remove_all_destinations(&self) {
        self.registry.remove_all();
    }

    pub fn count_destinations(&self) -> usize {
        self.registry.count()
    }

    /// Append sensitive payloads to messages from now on
    pub fn set_logs_sensitive(&self, enabled: bool) {
        self.logs_sensitive.store(enabled, Ordering::SeqCst);
    }

    pub fn logs_sensitive(&self) -> bool {
        self.logs_sensitive.load(Ordering::SeqCst)
    }

    /// Designate the thread whose label is empty
    pub fn set_main_thread(&mut self, thread: ThreadId) {
        self.main_thread = Some(thread);
    }

    /// Something generally unimportant (lowest priority)
    #[inline]
    pub fn verbose<F, M>(
        &self,
        message: F,
        sensitive: Option<&str>,
        call_site: CallSite<'_>,
        context: Option<LogContext>,
    ) where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.custom(LogLevel::Verbose, message, sensitive, call_site, context);
    }

    /// Something that helps while debugging (low priority)
    #[inline]
    pub fn debug<F, M>(
        &self,
        message: F,
        sensitive: Option<&str>,
        call_site: CallSite<'_>,
        context: Option<LogContext>,
    ) where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.custom(LogLevel::Debug, message, sensitive, call_site, context);
    }

    /// Something interesting that is not an issue (normal priority)
    #[inline]
    pub fn info<F, M>(
        &self,
        message: F,
        sensitive: Option<&str>,
        call_site: CallSite<'_>,
        context: Option<LogContext>,
    ) where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.custom(LogLevel::Info, message, sensitive, call_site, context);
    }

    /// Something that may cause trouble soon (high priority)
    #[inline]
    pub fn warning<F, M>(
        &self,
        message: F,
        sensitive: Option<&str>,
        call_site: CallSite<'_>,
        context: Option<LogContext>,
    ) where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.custom(LogLevel::Warning, message, sensitive, call_site, context);
    }

    /// Something that went wrong (highest priority)
    #[inline]
    pub fn error<F, M>(
        &self,
        message: F,
        sensitive: Option<&str>,
        call_site: CallSite<'_>,
        context: Option<LogContext>,
    ) where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.custom(LogLevel::Error, message, sensitive, call_site, context);
    }

    /// Log at an explicit level; the entry point for bridges from other
    /// logging frameworks
    pub fn custom<F, M>(
        &self,
        level: LogLevel,
        message: F,
        sensitive: Option<&str>,
        call_site: CallSite<'_>,
        context: Option<LogContext>,
    ) where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.dispatch(LogEvent {
            level,
            message,
            sensitive,
            call_site,
            context,
        });
    }

    /// Run one dispatch pass over a snapshot of the registry
    ///
    /// The message thunk runs at most once, and only if a destination
    /// declares message filters or accepts the event. Asynchronous
    /// destinations get the delivery queued; synchronous ones are waited for.
    pub fn dispatch<F, M>(&self, event: LogEvent<'_, F>)
    where
        F: FnOnce() -> M,
        M: fmt::Display,
    {
        self.metrics.record_dispatched();

        let destinations = self.registry.snapshot();
        if destinations.is_empty() {
            return;
        }

        let LogEvent {
            level,
            message,
            sensitive,
            call_site,
            context,
        } = event;

        let thread: Arc<str> = Arc::from(thread_label(self.main_thread));
        let include_sensitive = self.logs_sensitive() && sensitive.is_some_and(|s| !s.is_empty());
        let mut message = LazyMessage::new(message, sensitive.filter(|_| include_sensitive));

        // Shared by every entry built in this pass
        let timestamp = Utc::now();
        let file: Arc<str> = Arc::from(call_site.file);
        let function: Arc<str> = Arc::from(strip_params(call_site.function));
        let context = context.map(Arc::new);

        for destination in destinations {
            let Some(queue) = destination.queue().filter(|q| q.is_open()) else {
                self.metrics.record_skipped();
                continue;
            };

            if destination.has_message_filters() && !message.is_resolved() {
                message.resolve();
                self.metrics.record_materialized();
            }

            if !destination.should_log(level, call_site.file, call_site.function, message.peek()) {
                continue;
            }

            if !message.is_resolved() {
                self.metrics.record_materialized();
            }
            let entry = LogEntry {
                level,
                message: message.resolve(),
                timestamp,
                thread: Arc::clone(&thread),
                file: Arc::clone(&file),
                function: Arc::clone(&function),
                line: call_site.line,
                context: context.clone(),
            };

            let target = Arc::clone(&destination);
            let scheduled = if destination.is_asynchronous() {
                queue.execute_async(move || {
                    target.deliver(&entry);
                })
            } else {
                queue.execute_sync(move || target.deliver(&entry)).map(|_| ())
            };

            match scheduled {
                Ok(()) => {
                    self.metrics.record_scheduled();
                }
                Err(LoggerError::TaskPanicked { .. }) => {
                    // Reached the destination, which then panicked
                    self.metrics.record_scheduled();
                    self.metrics.record_failed();
                }
                Err(_) => {
                    // Closed or overflowing queue: the destination sits this event out
                    self.metrics.record_skipped();
                }
            }
        }
    }

    /// Flush every destination, waiting at most `timeout`
    ///
    /// A flush task is queued behind the pending deliveries of each
    /// destination with a usable queue. Returns `true` if all of them
    /// finished before the deadline. Tasks still running at the deadline are
    /// not cancelled; they complete in the background.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_dispatcher::prelude::*;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::new();
    /// logger.add_destination(Arc::new(MemoryDestination::new().unwrap()));
    ///
    /// if !logger.flush(Duration::from_secs(2)) {
    ///     eprintln!("Warning: not every destination flushed in time");
    /// }
    /// ```
    pub fn flush(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let (done_tx, done_rx) = unbounded::<()>();
        let mut pending = 0usize;

        for destination in self.registry.snapshot() {
            let Some(queue) = destination.queue().filter(|q| q.is_open()) else {
                continue;
            };

            let done = done_tx.clone();
            let target = Arc::clone(&destination);
            let submitted = queue.execute_before(
                move || {
                    target.flush();
                    let _ = done.send(());
                },
                deadline,
            );

            match submitted {
                Ok(()) => pending += 1,
                Err(LoggerError::QueueTimeout { .. }) => {
                    self.metrics.record_flush_timeout();
                    return false;
                }
                // Closed in the meantime: nothing left to flush there
                Err(_) => continue,
            }
        }
        drop(done_tx);

        for _ in 0..pending {
            if done_rx.recv_deadline(deadline).is_err() {
                self.metrics.record_flush_timeout();
                return false;
            }
        }

        self.metrics.record_flush_completed();
        true
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("registry", &self.registry)
            .field("logs_sensitive", &self.logs_sensitive())
            .field("main_thread", &self.main_thread)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .main_thread(std::thread::current().id())
///     .destination(Arc::new(ConsoleDestination::new().unwrap()))
///     .build();
/// ```
pub struct LoggerBuilder {
    registry: Option<Arc<DestinationRegistry>>,
    destinations: Vec<Arc<dyn Destination>>,
    logs_sensitive: bool,
    main_thread: Option<ThreadId>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            destinations: Vec::new(),
            logs_sensitive: false,
            main_thread: None,
        }
    }

    /// Share an existing registry instead of creating a fresh one
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<DestinationRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn destination(mut self, destination: Arc<dyn Destination>) -> Self {
        self.destinations.push(destination);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logs_sensitive(mut self, enabled: bool) -> Self {
        self.logs_sensitive = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn main_thread(mut self, thread: ThreadId) -> Self {
        self.main_thread = Some(thread);
        self
    }

    pub fn build(self) -> Logger {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(DestinationRegistry::new()));
        let mut logger = Logger::with_registry(registry);

        logger.set_logs_sensitive(self.logs_sensitive);
        if let Some(thread) = self.main_thread {
            logger.set_main_thread(thread);
        }
        for destination in self.destinations {
            logger.add_destination(destination);
        }

        logger
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
