//! File destination example
//!
//! Demonstrates text and JSON-lines files, message filters and the
//! process-wide logger.
//!
//! Run with: cargo run --example file_logging

use rust_log_dispatcher::core::{Comparison, Filter};
use rust_log_dispatcher::global;
use rust_log_dispatcher::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - File Logging Example ===\n");

    let text = Arc::new(FileDestination::new("app.log")?);
    let json = Arc::new(
        FileDestination::with_config(
            "audit.jsonl",
            DestinationConfig::new()
                .min_level(LogLevel::Info)
                .filter(Filter::message(Comparison::Contains, ["payment", "refund"]).case_insensitive()),
        )?
        .with_output_format(OutputFormat::Json)
        .with_timestamp_format(TimestampFormat::UnixMillis),
    );

    global::add_destination(text.clone());
    global::add_destination(json.clone());
    println!("1. Registered {} destinations", global::count_destinations());

    let logger = global::logger();
    info!(logger, "Service starting");
    info!(logger, context = LogContext::new().with_field("amount", 19.99); "Payment captured");
    warning!(logger, "Refund requested for order {}", 1001);
    debug!(logger, "Cache warmed");

    if global::flush(Duration::from_secs(2)) {
        println!("2. Flushed to {} and {}", text.path().display(), json.path().display());
    } else {
        eprintln!("Warning: flush timed out");
    }

    global::remove_all_destinations();
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
