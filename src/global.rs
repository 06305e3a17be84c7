//! Process-wide default logger
//!
//! The global [`Logger`] is created lazily on first use. Call [`init`]
//! before anything logs to install a custom-built one instead.
//!
//! # Example
//!
//! ```
//! use rust_log_dispatcher::{global, info, MemoryDestination};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let memory = Arc::new(MemoryDestination::new().unwrap());
//! global::add_destination(memory.clone());
//!
//! info!(global::logger(), "hello from anywhere");
//! assert!(global::flush(Duration::from_secs(1)));
//! assert_eq!(memory.len(), 1);
//! ```

use crate::core::{Destination, Logger, LoggerError, Result};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, created on first access
pub fn logger() -> &'static Logger {
    GLOBAL_LOGGER.get_or_init(Logger::new)
}

/// Install `logger` as the process-wide logger
///
/// Fails if the global logger was already initialized, either by an
/// earlier `init` or by a call that used the default.
pub fn init(logger: Logger) -> Result<()> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::config("global logger", "already initialized"))
}

pub fn add_destination(destination: Arc<dyn Destination>) -> bool {
    logger().add_destination(destination)
}

pub fn remove_destination<D: Destination + ?Sized>(destination: &Arc<D>) -> bool {
    logger().remove_destination(destination)
}

pub fn remove_all_destinations() {
    logger().remove_all_destinations();
}

pub fn count_destinations() -> usize {
    logger().count_destinations()
}

pub fn set_logs_sensitive(enabled: bool) {
    logger().set_logs_sensitive(enabled);
}

pub fn logs_sensitive() -> bool {
    logger().logs_sensitive()
}

pub fn flush(timeout: Duration) -> bool {
    logger().flush(timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destinations::MemoryDestination;

    // Single test: the global instance is shared by every test in this binary
    #[test]
    fn test_global_round_trip() {
        let memory: Arc<MemoryDestination> = Arc::new(MemoryDestination::new().unwrap());
        assert!(add_destination(memory.clone()));
        assert!(!add_destination(memory.clone()));

        crate::info!(logger(), "global {}", 1);
        assert!(flush(Duration::from_secs(1)));
        assert_eq!(memory.messages(), vec!["global 1"]);

        assert!(init(Logger::new()).is_err());
        assert!(remove_destination(&memory));
        assert!(!remove_destination(&memory));
    }
}
