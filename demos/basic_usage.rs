//! Basic logger usage example
//!
//! Demonstrates pretty console output, child loggers, interpolation and
//! error records.
//!
//! Run with: cargo run --example basic_usage

use rust_structlog::prelude::*;
use rust_structlog::{debug, info};

fn main() -> Result<()> {
    println!("=== Rust Structlog - Basic Usage Example ===\n");

    let base = Logger::builder()
        .format(OutputFormat::PRETTY)
        .min_level(Level::TRACE)
        .middleware(Interpolation)
        .caller("caller", 0)
        .build()?;

    let default = base.with([Attr::string("instance", "default")]);
    let local = base.with([Attr::string("instance", "local")]);

    println!("1. Logging at different levels:");
    default.trace("trace message", []);
    local.debug("debug message", []);
    local.info("info message", []);
    local.warn("warning message", []);

    println!("\n2. Attributes and interpolation:");
    local.debug(
        "debug message with \"{{ key }}\" and attr",
        [Attr::string("key", "interpolation")],
    );
    local.debug("debug message with attr only", [Attr::string("key", "interpolation")]);
    default.warn("warn message with interpolation from \"{{ instance }}\" instance", []);
    local.warn("warn message with interpolation from \"{{ instance }}\" instance", []);

    println!("\n3. Macros:");
    info!(local, "processed {} items", 42; "batch" => 7);
    debug!(local, "user {{ user }} logged in"; "user" => "ada");

    println!("\n4. Errors:");
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
    default.error(&err, "oh, error?", []);
    local.error(&err, "oh, error?", [Attr::duration("after", std::time::Duration::from_millis(350))]);

    println!("\n5. Malformed template produces an extra error record:");
    local.info("unclosed {{ placeholder", []);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
