//! Core dispatcher types and traits

pub mod call_site;
pub mod destination;
pub mod error;
pub mod filter;
pub mod format;
pub mod log_context;
pub mod log_entry;
pub mod log_event;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod queue;
pub mod registry;

pub use call_site::{strip_params, thread_label, CallSite};
pub use destination::{Destination, DestinationConfig};
pub use error::{LoggerError, Result};
pub use filter::{filters_accept, Comparison, Filter, FilterTarget};
pub use format::{OutputFormat, TimestampFormat};
pub use log_context::{FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_event::LogEvent;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::{DispatchMetrics, QueueMetrics};
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use queue::{DispatchQueue, QueueConfig, DEFAULT_SHUTDOWN_TIMEOUT};
pub use registry::DestinationRegistry;
