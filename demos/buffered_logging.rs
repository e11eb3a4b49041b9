//! Buffered logging example
//!
//! Demonstrates batched logfmt output flushed on a timer, from several
//! threads at once.
//!
//! Run with: cargo run --example buffered_logging

use rust_structlog::prelude::*;
use std::thread;
use std::time::{Duration, Instant};

fn main() -> Result<()> {
    println!("=== Rust Structlog - Buffered Logging Example ===\n");

    let logger = Logger::builder()
        .format(OutputFormat::LOGFMT)
        .min_level(Level::INFO)
        .buffered(Duration::from_millis(50))
        .build()?;

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let logger = logger.with([Attr::int("worker", worker)]);
            thread::spawn(move || {
                for job in 0..5 {
                    logger.info("job done", [Attr::int("job", job)]);
                    thread::sleep(Duration::from_millis(10));
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    logger.info("all workers finished", [Attr::duration("elapsed", start.elapsed())]);
    logger.flush()?;

    let metrics = logger.metrics();
    println!(
        "\nwritten: {}, failed: {}, filtered: {}",
        metrics.total_logged(),
        metrics.failed_count(),
        metrics.filtered_count()
    );
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
