//! Basic dispatcher usage example
//!
//! Demonstrates a console destination, the level macros, sensitive payloads
//! and structured context.
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatcher::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Basic Usage Example ===\n");

    // Synchronous delivery keeps demo output in program order
    let console = Arc::new(ConsoleDestination::with_config(
        DestinationConfig::new().min_level(LogLevel::Verbose).synchronous(),
    )?);
    let logger = Logger::builder()
        .main_thread(std::thread::current().id())
        .destination(console.clone())
        .build();

    println!("1. Logging at different levels:");
    verbose!(logger, "This is a verbose message");
    debug!(logger, "This is a debug message");
    info!(logger, "This is an info message");
    warning!(logger, "This is a warning message");
    error!(logger, "This is an error message");

    println!("\n2. Sensitive payloads:");
    let token = "Bearer abc.def";
    info!(logger, sensitive = token; "Authorized request (token hidden)");
    logger.set_logs_sensitive(true);
    info!(logger, sensitive = token; "Authorized request (token shown)");
    logger.set_logs_sensitive(false);

    println!("\n3. Structured context:");
    let ctx = LogContext::new()
        .with_field("user_id", 42)
        .with_field("route", "/api/orders");
    info!(logger, context = ctx; "Order created in {} ms", 17);

    println!("\n4. Raising the threshold with a second destination:");
    let quiet = Arc::new(ConsoleDestination::with_config(
        DestinationConfig::new().min_level(LogLevel::Warning).synchronous(),
    )?);
    logger.remove_destination(&console);
    logger.add_destination(quiet);
    debug!(logger, "Debug message (hidden)");
    warning!(logger, "Warning message (visible)");

    logger.flush(Duration::from_secs(1));
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
