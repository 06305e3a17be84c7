//! Async dispatch example
//!
//! Demonstrates asynchronous destinations, multi-threaded callers, bounded
//! queues and a coordinated flush.
//!
//! Run with: cargo run --example async_logging

use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::{OverflowPolicy, QueueConfig};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Async Logging Example ===\n");

    let console = Arc::new(ConsoleDestination::new()?);
    let memory = Arc::new(MemoryDestination::new()?);
    let logger = Arc::new(
        Logger::builder()
            .main_thread(thread::current().id())
            .destination(console)
            .destination(memory.clone())
            .build(),
    );

    println!("1. Multi-threaded logging:");
    let mut handles = vec![];
    for thread_id in 0..4 {
        let logger = Arc::clone(&logger);
        let handle = thread::Builder::new()
            .name(format!("worker-{}", thread_id))
            .spawn(move || {
                for i in 0..5 {
                    info!(logger, "Thread {} - Message {}", thread_id, i);
                    thread::sleep(Duration::from_millis(5));
                }
            })?;
        handles.push(handle);
    }
    for handle in handles {
        let _ = handle.join();
    }

    let started = Instant::now();
    let flushed = logger.flush(Duration::from_secs(2));
    println!(
        "\n   flush returned {} after {:?}; {} entries captured in memory",
        flushed,
        started.elapsed(),
        memory.len()
    );

    println!("\n2. Bounded queue dropping under burst load:");
    let bounded = Arc::new(MemoryDestination::with_config(
        DestinationConfig::new().queue(
            QueueConfig::bounded(16)
                .overflow_policy(OverflowPolicy::AlertAndDrop)
                .on_overflow(Arc::new(|dropped: u64| {
                    eprintln!("   overflow callback: {} dropped", dropped);
                })),
        ),
    )?);
    let burst = Logger::builder().destination(bounded.clone()).build();
    for i in 0..10_000 {
        verbose!(burst, "burst {}", i);
    }
    burst.flush(Duration::from_secs(2));
    println!(
        "   kept {} of 10000; {} deliveries skipped",
        bounded.len(),
        burst.metrics().destinations_skipped()
    );

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
