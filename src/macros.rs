//! Logging macros with call-site capture and deferred formatting.
//!
//! The level macros take a logger expression, optional `sensitive = expr;`
//! and `context = expr;` prefixes (in that order), then `format!`
//! arguments. Formatting happens inside the message closure, so it only
//! runs when some destination accepts the event.
//!
//! # Examples
//!
//! ```
//! use rust_log_dispatcher::prelude::*;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Sensitive payload, only appended while sensitive logging is on
//! let token = String::from("abc123");
//! debug!(logger, sensitive = token; "token refreshed");
//!
//! // Structured context
//! let ctx = LogContext::new().with_field("request_id", "r-17");
//! error!(logger, context = ctx; "request failed after {} retries", 3);
//! ```

/// Path of the enclosing function, e.g. `my_crate::net::connect`
///
/// Closure frames are folded into the function that contains them.
///
/// ```
/// use rust_log_dispatcher::function_name;
///
/// fn handshake() -> &'static str {
///     function_name!()
/// }
/// assert!(handshake().ends_with("handshake"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        $crate::core::call_site::enclosing_function($crate::core::call_site::type_name_of(__here))
    }};
}

/// [`CallSite`](crate::core::CallSite) of the macro invocation
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::core::CallSite::new(file!(), $crate::function_name!(), line!())
    };
}

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let logger = Logger::new();
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, sensitive = $sensitive:expr; context = $context:expr; $($arg:tt)+) => {
        $logger.custom(
            $level,
            || ::std::format!($($arg)+),
            ::std::option::Option::Some(::std::convert::AsRef::<str>::as_ref(&$sensitive)),
            $crate::call_site!(),
            ::std::option::Option::Some($context),
        )
    };
    ($logger:expr, $level:expr, sensitive = $sensitive:expr; $($arg:tt)+) => {
        $logger.custom(
            $level,
            || ::std::format!($($arg)+),
            ::std::option::Option::Some(::std::convert::AsRef::<str>::as_ref(&$sensitive)),
            $crate::call_site!(),
            ::std::option::Option::None,
        )
    };
    ($logger:expr, $level:expr, context = $context:expr; $($arg:tt)+) => {
        $logger.custom(
            $level,
            || ::std::format!($($arg)+),
            ::std::option::Option::None,
            $crate::call_site!(),
            ::std::option::Option::Some($context),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.custom(
            $level,
            || ::std::format!($($arg)+),
            ::std::option::Option::None,
            $crate::call_site!(),
            ::std::option::Option::None,
        )
    };
}

/// Log a verbose-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let logger = Logger::new();
/// verbose!(logger, "Entering function: calculate()");
/// verbose!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Verbose, $($rest)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let logger = Logger::new();
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Debug, $($rest)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let logger = Logger::new();
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Info, $($rest)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let logger = Logger::new();
/// warning!(logger, "Low disk space");
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Warning, $($rest)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let logger = Logger::new();
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Error, $($rest)+)
    };
}
