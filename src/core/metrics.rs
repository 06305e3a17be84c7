//! Dispatcher and queue metrics for observability
//!
//! Provides counters for monitoring dispatch health: how many events were
//! materialized and delivered, how many destinations were skipped, and how
//! flushes and per-destination queues behaved.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by a [`Logger`](crate::Logger)
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_materialized();
///
/// assert_eq!(metrics.events_dispatched(), 1);
/// assert_eq!(metrics.messages_materialized(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Dispatch passes started
    events_dispatched: AtomicU64,

    /// Message thunks actually invoked
    messages_materialized: AtomicU64,

    /// Deliveries handed to a destination queue
    deliveries_scheduled: AtomicU64,

    /// Destinations passed over because their queue was unusable
    destinations_skipped: AtomicU64,

    /// Synchronous deliveries that panicked inside the destination
    deliveries_failed: AtomicU64,

    flushes_completed: AtomicU64,

    flush_timeouts: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            events_dispatched: AtomicU64::new(0),
            messages_materialized: AtomicU64::new(0),
            deliveries_scheduled: AtomicU64::new(0),
            destinations_skipped: AtomicU64::new(0),
            deliveries_failed: AtomicU64::new(0),
            flushes_completed: AtomicU64::new(0),
            flush_timeouts: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn messages_materialized(&self) -> u64 {
        self.messages_materialized.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_scheduled(&self) -> u64 {
        self.deliveries_scheduled.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn destinations_skipped(&self) -> u64 {
        self.destinations_skipped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries_failed(&self) -> u64 {
        self.deliveries_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes_completed(&self) -> u64 {
        self.flushes_completed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_timeouts(&self) -> u64 {
        self.flush_timeouts.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_materialized(&self) -> u64 {
        self.messages_materialized.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_scheduled(&self) -> u64 {
        self.deliveries_scheduled.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_skipped(&self) -> u64 {
        self.destinations_skipped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_completed(&self) -> u64 {
        self.flushes_completed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_timeout(&self) -> u64 {
        self.flush_timeouts.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.events_dispatched.store(0, Ordering::Relaxed);
        self.messages_materialized.store(0, Ordering::Relaxed);
        self.deliveries_scheduled.store(0, Ordering::Relaxed);
        self.destinations_skipped.store(0, Ordering::Relaxed);
        self.deliveries_failed.store(0, Ordering::Relaxed);
        self.flushes_completed.store(0, Ordering::Relaxed);
        self.flush_timeouts.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            events_dispatched: AtomicU64::new(self.events_dispatched()),
            messages_materialized: AtomicU64::new(self.messages_materialized()),
            deliveries_scheduled: AtomicU64::new(self.deliveries_scheduled()),
            destinations_skipped: AtomicU64::new(self.destinations_skipped()),
            deliveries_failed: AtomicU64::new(self.deliveries_failed()),
            flushes_completed: AtomicU64::new(self.flushes_completed()),
            flush_timeouts: AtomicU64::new(self.flush_timeouts()),
        }
    }
}

/// Counters maintained by a [`DispatchQueue`](crate::DispatchQueue)
#[derive(Debug)]
pub struct QueueMetrics {
    /// Tasks run to completion (including ones that panicked)
    tasks_executed: AtomicU64,

    tasks_panicked: AtomicU64,

    /// Tasks rejected by the overflow policy
    tasks_dropped: AtomicU64,

    queue_full_events: AtomicU64,

    block_events: AtomicU64,
}

impl QueueMetrics {
    pub const fn new() -> Self {
        Self {
            tasks_executed: AtomicU64::new(0),
            tasks_panicked: AtomicU64::new(0),
            tasks_dropped: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn tasks_executed(&self) -> u64 {
        self.tasks_executed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn tasks_panicked(&self) -> u64 {
        self.tasks_panicked.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn tasks_dropped(&self) -> u64 {
        self.tasks_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_executed(&self) -> u64 {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_panicked(&self) -> u64 {
        self.tasks_panicked.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.tasks_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Get drop rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no tasks have been submitted.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.tasks_dropped() as f64;
        let total = self.tasks_executed() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.tasks_executed.store(0, Ordering::Relaxed);
        self.tasks_panicked.store(0, Ordering::Relaxed);
        self.tasks_dropped.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for QueueMetrics {
    fn clone(&self) -> Self {
        Self {
            tasks_executed: AtomicU64::new(self.tasks_executed()),
            tasks_panicked: AtomicU64::new(self.tasks_panicked()),
            tasks_dropped: AtomicU64::new(self.tasks_dropped()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
            block_events: AtomicU64::new(self.block_events()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_metrics_new() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.events_dispatched(), 0);
        assert_eq!(metrics.messages_materialized(), 0);
        assert_eq!(metrics.deliveries_scheduled(), 0);
        assert_eq!(metrics.destinations_skipped(), 0);
        assert_eq!(metrics.deliveries_failed(), 0);
        assert_eq!(metrics.flush_timeouts(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.record_scheduled(), 0);
        assert_eq!(metrics.record_scheduled(), 1);
        assert_eq!(metrics.deliveries_scheduled(), 2);
    }

    #[test]
    fn test_queue_drop_rate() {
        let metrics = QueueMetrics::new();
        assert_eq!(metrics.drop_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_executed();
        }
        for _ in 0..10 {
            metrics.record_dropped();
        }

        let rate = metrics.drop_rate();
        assert!((9.9..=10.1).contains(&rate), "Drop rate was {}", rate);
    }

    #[test]
    fn test_clone_is_snapshot() {
        let metrics = QueueMetrics::new();
        metrics.record_executed();

        let snapshot = metrics.clone();
        metrics.record_executed();

        assert_eq!(snapshot.tasks_executed(), 1);
        assert_eq!(metrics.tasks_executed(), 2);
    }

    #[test]
    fn test_reset() {
        let metrics = DispatchMetrics::new();
        metrics.record_dispatched();
        metrics.record_failed();
        metrics.record_flush_timeout();
        metrics.reset();

        assert_eq!(metrics.events_dispatched(), 0);
        assert_eq!(metrics.deliveries_failed(), 0);
        assert_eq!(metrics.flush_timeouts(), 0);
    }
}
