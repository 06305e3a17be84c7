//! Overflow policies for bounded destination queues
//!
//! An asynchronous delivery onto a bounded [`DispatchQueue`](crate::DispatchQueue)
//! that is full is resolved by one of these policies. Unbounded queues
//! (the default) never overflow.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full bounded queue
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: alert and drop
/// let policy = OverflowPolicy::default();
///
/// // Block with timeout
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Drop the new task silently; only metrics record it
    DropNewest,

    /// Block the caller until space is available
    ///
    /// Turns asynchronous delivery into backpressure on the logging thread.
    Block,

    /// Block up to the given duration, then drop
    BlockWithTimeout(Duration),

    /// Drop the new task, alert on stderr and through the overflow callback
    #[default]
    AlertAndDrop,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::AlertAndDrop => write!(f, "AlertAndDrop"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when tasks are dropped because a queue is full.
/// The parameter is the total count of dropped tasks so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::AlertAndDrop);
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
        assert_eq!(OverflowPolicy::AlertAndDrop.to_string(), "AlertAndDrop");
    }
}
