//! Error types for the dispatcher and its destinations

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Worker thread for a destination queue could not be started
    #[error("Failed to spawn worker for queue '{label}'")]
    QueueSpawn {
        label: String,
        #[source]
        source: std::io::Error,
    },

    /// Queue worker is gone and no longer accepts tasks
    #[error("Queue '{label}' is closed")]
    QueueClosed { label: String },

    /// Bounded queue rejected a task
    #[error("Queue '{label}' full: {capacity} tasks pending")]
    QueueFull { label: String, capacity: usize },

    /// A task submitted with `execute_sync` panicked on the worker
    #[error("Task on queue '{label}' panicked")]
    TaskPanicked { label: String },

    /// A deadline passed before the task could be enqueued
    #[error("Timed out enqueueing onto queue '{label}'")]
    QueueTimeout { label: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn queue_spawn(label: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::QueueSpawn {
            label: label.into(),
            source,
        }
    }

    pub fn queue_closed(label: impl Into<String>) -> Self {
        LoggerError::QueueClosed {
            label: label.into(),
        }
    }

    pub fn queue_full(label: impl Into<String>, capacity: usize) -> Self {
        LoggerError::QueueFull {
            label: label.into(),
            capacity,
        }
    }

    pub fn task_panicked(label: impl Into<String>) -> Self {
        LoggerError::TaskPanicked {
            label: label.into(),
        }
    }

    pub fn queue_timeout(label: impl Into<String>) -> Self {
        LoggerError::QueueTimeout {
            label: label.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::queue_full("console", 16);
        assert!(matches!(err, LoggerError::QueueFull { .. }));

        let err = LoggerError::config("QueueConfig", "capacity must be non-zero");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::queue_closed("file");
        assert!(matches!(err, LoggerError::QueueClosed { .. }));

        let err = LoggerError::task_panicked("memory");
        assert_eq!(err.to_string(), "Task on queue 'memory' panicked");
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::queue_full("console", 16);
        assert_eq!(err.to_string(), "Queue 'console' full: 16 tasks pending");

        let err = LoggerError::queue_timeout("file");
        assert_eq!(err.to_string(), "Timed out enqueueing onto queue 'file'");

        let err = LoggerError::config("QueueConfig", "capacity must be non-zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for QueueConfig: capacity must be non-zero"
        );
    }

    #[test]
    fn test_queue_spawn_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err = LoggerError::queue_spawn("memory", io_err);

        assert!(err.to_string().contains("memory"));
        assert!(err.source().is_some());
    }
}
