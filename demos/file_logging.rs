//! File logging example
//!
//! Demonstrates JSON records appended to a file.
//!
//! Run with: cargo run --example file_logging

use rust_structlog::prelude::*;

#[derive(Debug, serde::Serialize)]
struct Plugin {
    name: &'static str,
    version: (u32, u32),
}

fn main() -> Result<()> {
    println!("=== Rust Structlog - File Logging Example ===\n");

    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .time("ts", TimestampFormat::Iso8601Micros)
        .file("application.log")
        .attrs([Attr::string("app", "file_logging")])
        .build()?;

    println!("1. Logging to 'application.log':");
    logger.info("Application started", []);
    logger.debug("Loading configuration...", [Attr::string("path", "config.toml")]);
    logger.warn("Using default settings for some options", [Attr::int("defaults", 3)]);

    let err = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad plugin header");
    logger.error(
        &err,
        "Failed to load optional plugin",
        [Attr::any("plugin", Plugin { name: "metrics", version: (1, 4) })],
    );

    println!("2. Performing some operations:");
    for i in 1..=5 {
        logger.info("Processing item", [Attr::int("item", i), Attr::int("total", 5)]);
    }
    logger.info("All operations completed", []);

    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");
    Ok(())
}
