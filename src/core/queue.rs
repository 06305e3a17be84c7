//! Serial execution queue owned by each destination
//!
//! Every [`DispatchQueue`] runs its tasks one at a time, in submission order,
//! on a dedicated worker thread. Callers either hand a task over and return
//! immediately ([`DispatchQueue::execute_async`]) or block until the worker
//! has run it ([`DispatchQueue::execute_sync`]).

use super::{
    error::{LoggerError, Result},
    metrics::QueueMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
};
use crossbeam_channel::{
    bounded, unbounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender, TrySendError,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::{Duration, Instant};

/// Default time a dropped queue waits for its pending tasks (5 seconds)
///
/// Used when a queue is dropped without an explicit [`DispatchQueue::shutdown`].
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Capacity and overflow behaviour of a [`DispatchQueue`]
#[derive(Clone, Default)]
pub struct QueueConfig {
    /// Maximum pending tasks; `None` means unbounded
    pub capacity: Option<usize>,
    /// What an asynchronous submission does when a bounded queue is full
    pub overflow: OverflowPolicy,
    pub on_overflow: Option<OverflowCallback>,
}

impl QueueConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    fn validate(&self, label: &str) -> Result<()> {
        if self.capacity == Some(0) {
            return Err(LoggerError::config(
                format!("queue '{}'", label),
                "capacity must be at least 1",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for QueueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueConfig")
            .field("capacity", &self.capacity)
            .field("overflow", &self.overflow)
            .field("on_overflow", &self.on_overflow.is_some())
            .finish()
    }
}

/// A serially executing task queue backed by one worker thread
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::DispatchQueue;
///
/// let queue = DispatchQueue::new("example").unwrap();
/// queue.execute_async(|| println!("runs later")).unwrap();
/// let answer = queue.execute_sync(|| 6 * 7).unwrap();
/// assert_eq!(answer, 42);
/// ```
pub struct DispatchQueue {
    label: String,
    sender: RwLock<Option<Sender<Task>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_id: ThreadId,
    /// Disconnects once the worker thread has exited
    finished: Receiver<()>,
    config: QueueConfig,
    metrics: Arc<QueueMetrics>,
}

impl DispatchQueue {
    /// Create an unbounded queue and start its worker thread
    pub fn new(label: impl Into<String>) -> Result<Self> {
        Self::with_config(label, QueueConfig::default())
    }

    pub fn with_config(label: impl Into<String>, config: QueueConfig) -> Result<Self> {
        let label = label.into();
        config.validate(&label)?;

        let (sender, receiver) = match config.capacity {
            Some(capacity) => bounded::<Task>(capacity),
            None => unbounded::<Task>(),
        };
        let metrics = Arc::new(QueueMetrics::new());
        let worker_metrics = Arc::clone(&metrics);
        let worker_label = label.clone();
        let (finished_tx, finished_rx) = bounded::<()>(0);

        let handle = thread::Builder::new()
            .name(label.clone())
            .spawn(move || {
                let _finished = finished_tx;
                // Ends once every sender is gone and the backlog is drained
                for task in receiver.iter() {
                    Self::run_task(&worker_label, task, &worker_metrics);
                }
            })
            .map_err(|e| LoggerError::queue_spawn(label.as_str(), e))?;

        let worker_id = handle.thread().id();

        Ok(Self {
            label,
            sender: RwLock::new(Some(sender)),
            worker: Mutex::new(Some(handle)),
            worker_id,
            finished: finished_rx,
            config,
            metrics,
        })
    }

    /// Run one task with panic isolation
    ///
    /// A panicking task is reported and counted; the worker keeps serving
    /// the rest of the queue.
    fn run_task(label: &str, task: Task, metrics: &QueueMetrics) {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task));
        metrics.record_executed();

        if let Err(panic_info) = outcome {
            metrics.record_panicked();
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            eprintln!(
                "[LOGGER CRITICAL] Task on queue '{}' panicked: {}. \
                 Queue continues to run.",
                label, panic_msg
            );
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    /// Whether the queue still accepts tasks
    pub fn is_open(&self) -> bool {
        self.sender.read().is_some()
    }

    /// Number of tasks waiting for the worker
    pub fn pending(&self) -> usize {
        self.sender.read().as_ref().map_or(0, |s| s.len())
    }

    /// Whether the calling thread is this queue's worker
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    fn sender(&self) -> Result<Sender<Task>> {
        self.sender
            .read()
            .clone()
            .ok_or_else(|| LoggerError::queue_closed(self.label.as_str()))
    }

    /// Submit a task and return without waiting for it to run
    ///
    /// On a full bounded queue the configured [`OverflowPolicy`] decides
    /// whether the caller blocks or the task is dropped.
    pub fn execute_async<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender()?;
        let task: Task = Box::new(task);

        match sender.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(task)) => self.handle_overflow(&sender, task),
            Err(TrySendError::Disconnected(_)) => Err(LoggerError::queue_closed(self.label.as_str())),
        }
    }

    /// Submit a task and block until the worker has run it
    ///
    /// Called from the queue's own worker thread, the task runs inline
    /// instead of deadlocking behind itself.
    pub fn execute_sync<F, R>(&self, task: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        if self.is_current() {
            return Ok(task());
        }

        let sender = self.sender()?;
        let (done_tx, done_rx) = bounded::<R>(1);
        let job: Task = Box::new(move || {
            let _ = done_tx.send(task());
        });

        sender
            .send(job)
            .map_err(|_| LoggerError::queue_closed(self.label.as_str()))?;

        // The reply sender is dropped without a value if the task panicked
        done_rx
            .recv()
            .map_err(|_| LoggerError::task_panicked(self.label.as_str()))
    }

    /// Submit a task, waiting for space no later than `deadline`
    ///
    /// Ignores the overflow policy: the task is either enqueued or the call
    /// fails with [`LoggerError::QueueTimeout`].
    pub fn execute_before<F>(&self, task: F, deadline: Instant) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender()?;
        let task: Task = Box::new(task);

        match sender.send_deadline(task, deadline) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(LoggerError::queue_timeout(self.label.as_str())),
            Err(SendTimeoutError::Disconnected(_)) => {
                Err(LoggerError::queue_closed(self.label.as_str()))
            }
        }
    }

    fn handle_overflow(&self, sender: &Sender<Task>, task: Task) -> Result<()> {
        self.metrics.record_queue_full();
        let capacity = self.config.capacity.unwrap_or_default();

        match &self.config.overflow {
            OverflowPolicy::DropNewest => {
                self.metrics.record_dropped();
                Err(LoggerError::queue_full(self.label.as_str(), capacity))
            }

            OverflowPolicy::Block => {
                self.metrics.record_block();
                sender
                    .send(task)
                    .map_err(|_| LoggerError::queue_closed(self.label.as_str()))
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match sender.send_timeout(task, *timeout) {
                    Ok(()) => Ok(()),
                    Err(SendTimeoutError::Timeout(_)) => {
                        self.alert_and_drop();
                        Err(LoggerError::queue_full(self.label.as_str(), capacity))
                    }
                    Err(SendTimeoutError::Disconnected(_)) => {
                        Err(LoggerError::queue_closed(self.label.as_str()))
                    }
                }
            }

            OverflowPolicy::AlertAndDrop => {
                self.alert_and_drop();
                Err(LoggerError::queue_full(self.label.as_str(), capacity))
            }
        }
    }

    fn alert_and_drop(&self) {
        let dropped_count = self.metrics.record_dropped();

        // Alert on first drop and periodically thereafter
        let should_alert = dropped_count == 0 || (dropped_count + 1) % 1000 == 0;

        if should_alert {
            eprintln!(
                "[LOGGER WARNING] Queue '{}' full, {} tasks dropped. \
                 Consider a larger capacity or a different overflow policy.",
                self.label,
                dropped_count + 1
            );

            if let Some(ref callback) = self.config.on_overflow {
                callback(dropped_count + 1);
            }
        }
    }

    /// Close the queue and wait for the worker to drain pending tasks
    ///
    /// Returns `true` if the worker finished within `timeout`. Further
    /// submissions fail with [`LoggerError::QueueClosed`]. Called from the
    /// worker itself, the queue is closed but not awaited and `false` is
    /// returned.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        drop(self.sender.write().take());

        if self.is_current() {
            return false;
        }

        let Some(handle) = self.worker.lock().take() else {
            return true;
        };

        match self.finished.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => {
                eprintln!(
                    "[LOGGER WARNING] Worker for queue '{}' did not finish within {:?}. \
                     Pending tasks keep running in the background.",
                    self.label, timeout
                );
                false
            }
            // The worker never sends; disconnection means it has exited
            Ok(()) | Err(RecvTimeoutError::Disconnected) => match handle.join() {
                Ok(()) => true,
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Worker for queue '{}' panicked during shutdown: {:?}",
                        self.label, e
                    );
                    false
                }
            },
        }
    }
}

impl fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("label", &self.label)
            .field("open", &self.is_open())
            .field("pending", &self.pending())
            .field("config", &self.config)
            .finish()
    }
}

impl Drop for DispatchQueue {
    fn drop(&mut self) {
        // The last owner may be a task running on this very queue; closing
        // the channel lets the worker exit on its own after that task.
        if self.is_current() {
            drop(self.sender.get_mut().take());
            return;
        }
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_execute_sync_returns_value() {
        let queue = DispatchQueue::new("sync").unwrap();
        assert_eq!(queue.execute_sync(|| 40 + 2).unwrap(), 42);
    }

    #[test]
    fn test_tasks_run_in_submission_order() {
        let queue = DispatchQueue::new("fifo").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for i in 0..100 {
            let seen = Arc::clone(&seen);
            queue.execute_async(move || seen.lock().push(i)).unwrap();
        }
        queue.execute_sync(|| ()).unwrap();

        assert_eq!(*seen.lock(), (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_worker_thread_is_named_after_label() {
        let queue = DispatchQueue::new("named-queue").unwrap();
        let name = queue
            .execute_sync(|| thread::current().name().map(String::from))
            .unwrap();
        assert_eq!(name.as_deref(), Some("named-queue"));
    }

    #[test]
    fn test_panic_is_isolated() {
        let queue = DispatchQueue::new("panicky").unwrap();
        queue.execute_async(|| panic!("boom")).unwrap();

        assert_eq!(queue.execute_sync(|| 1).unwrap(), 1);
        assert_eq!(queue.metrics().tasks_panicked(), 1);
    }

    #[test]
    fn test_sync_panic_reports_error() {
        let queue = DispatchQueue::new("sync-panic").unwrap();
        let result = queue.execute_sync(|| -> u8 { panic!("inside") });
        assert!(matches!(result, Err(LoggerError::TaskPanicked { .. })));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = DispatchQueue::with_config("zero", QueueConfig::bounded(0));
        assert!(matches!(
            result,
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_drop_newest_when_full() {
        let config = QueueConfig::bounded(1).overflow_policy(OverflowPolicy::DropNewest);
        let queue = DispatchQueue::with_config("small", config).unwrap();
        let (release_tx, release_rx) = bounded::<()>(0);
        let (started_tx, started_rx) = bounded::<()>(0);

        // Occupy the worker, then fill the single slot
        queue
            .execute_async(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
            .unwrap();
        started_rx.recv().unwrap();
        queue.execute_async(|| ()).unwrap();

        let result = queue.execute_async(|| ());
        assert!(matches!(result, Err(LoggerError::QueueFull { .. })));
        assert_eq!(queue.metrics().tasks_dropped(), 1);

        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_overflow_callback_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let config = QueueConfig::bounded(1).on_overflow(Arc::new(move |_| {
            calls_clone.fetch_add(1, Ordering::Relaxed);
        }));
        let queue = DispatchQueue::with_config("alert", config).unwrap();
        let (release_tx, release_rx) = bounded::<()>(0);
        let (started_tx, started_rx) = bounded::<()>(0);

        queue
            .execute_async(move || {
                started_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
            .unwrap();
        started_rx.recv().unwrap();
        queue.execute_async(|| ()).unwrap();
        let _ = queue.execute_async(|| ());

        assert_eq!(calls.load(Ordering::Relaxed), 1);
        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_shutdown_drains_and_closes() {
        let queue = DispatchQueue::new("drain").unwrap();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            let count = Arc::clone(&count);
            queue
                .execute_async(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        assert!(queue.shutdown(Duration::from_secs(2)));
        assert_eq!(count.load(Ordering::SeqCst), 10);
        assert!(!queue.is_open());
        assert!(matches!(
            queue.execute_async(|| ()),
            Err(LoggerError::QueueClosed { .. })
        ));
    }

    #[test]
    fn test_idle_shutdown_returns_promptly() {
        let fastest = (0..5)
            .map(|i| {
                let queue = DispatchQueue::new(format!("idle-{}", i)).unwrap();
                let started = Instant::now();
                assert!(queue.shutdown(Duration::from_secs(2)));
                started.elapsed()
            })
            .min()
            .unwrap();

        assert!(fastest < Duration::from_millis(5), "fastest shutdown took {:?}", fastest);
    }

    #[test]
    fn test_shutdown_times_out_on_busy_worker() {
        let queue = DispatchQueue::new("busy").unwrap();
        let (release_tx, release_rx) = bounded::<()>(0);
        queue
            .execute_async(move || {
                let _ = release_rx.recv();
            })
            .unwrap();

        let started = Instant::now();
        assert!(!queue.shutdown(Duration::from_millis(50)));
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!queue.is_open());
        release_tx.send(()).unwrap();
    }

    #[test]
    fn test_execute_sync_from_worker_runs_inline() {
        let queue = Arc::new(DispatchQueue::new("reentrant").unwrap());
        let inner = Arc::clone(&queue);

        let value = queue
            .execute_sync(move || inner.execute_sync(|| 7).unwrap())
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_execute_before_deadline() {
        let queue = DispatchQueue::new("deadline").unwrap();
        let deadline = Instant::now() + Duration::from_secs(1);
        assert!(queue.execute_before(|| (), deadline).is_ok());
    }
}
