//! # Rust Log Dispatcher
//!
//! A structured-logging fan-out dispatcher: every log call is offered to a
//! set of destinations, each with its own level threshold, filters and
//! serial delivery queue.
//!
//! ## Features
//!
//! - **Lazy messages**: the message closure runs only if some destination
//!   accepts the event, and at most once per call
//! - **Per-destination queues**: asynchronous or synchronous delivery, FIFO
//!   per caller thread, isolated from panicking destinations
//! - **Sensitive payloads**: appended only while sensitive logging is on
//! - **Coordinated flush**: one deadline across all destinations
//!
//! ## Example
//!
//! ```
//! use rust_log_dispatcher::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let memory = Arc::new(MemoryDestination::new().unwrap());
//! let logger = Logger::builder().destination(memory.clone()).build();
//!
//! let user = "alice";
//! info!(logger, "user {} signed in", user);
//! warning!(logger, sensitive = "token=abc"; "token refresh failed");
//!
//! assert!(logger.flush(Duration::from_secs(1)));
//! assert_eq!(memory.len(), 2);
//! ```

pub mod core;
pub mod destinations;
pub mod global;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::destinations::ConsoleDestination;
    #[cfg(feature = "file")]
    pub use crate::destinations::FileDestination;
    pub use crate::destinations::MemoryDestination;

    pub use crate::core::{
        CallSite, Comparison, Destination, DestinationConfig, DestinationRegistry, FieldValue,
        Filter, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, OutputFormat,
        Result, TimestampFormat,
    };
    pub use crate::{call_site, debug, error, function_name, info, log, verbose, warning};
}

#[cfg(feature = "console")]
pub use crate::destinations::ConsoleDestination;
#[cfg(feature = "file")]
pub use crate::destinations::FileDestination;
pub use crate::destinations::MemoryDestination;

pub use crate::core::{
    strip_params, CallSite, Comparison, Destination, DestinationConfig, DestinationRegistry,
    DispatchMetrics, DispatchQueue, FieldValue, Filter, FilterTarget, LogContext, LogEntry,
    LogLevel, Logger, LoggerBuilder, LoggerError, OutputFormat, OverflowCallback, OverflowPolicy,
    QueueConfig, QueueMetrics, Result, TimestampFormat, DEFAULT_SHUTDOWN_TIMEOUT,
};
