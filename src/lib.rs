//! # Rust Structlog
//!
//! A structured-logging engine: records carry a timestamp, a level, a
//! message and a sorted set of typed attributes, and are rendered as JSON,
//! logfmt or a human-readable pretty layout.
//!
//! ## Features
//!
//! - **Typed attributes**: allocation-free scalars, strings, durations, times and
//!   arbitrary serializable values
//! - **Pooled scratch state**: attribute sets, buffers and caller descriptors are reused
//! - **Middlewares**: records can be rewritten before output, e.g. `{{ key }}` interpolation
//! - **Batched output**: [`appenders::BufferWriter`] flushes on a timer
//! - **Call-site capture**: optional `file:line function` attribute
//!
//! ## Example
//!
//! ```
//! use rust_structlog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .format(OutputFormat::LOGFMT)
//!     .middleware(Interpolation)
//!     .sink(std::io::sink())
//!     .build()
//!     .unwrap();
//!
//! let request = logger.with([Attr::string("request_id", "r-17")]);
//! request.info("handled {{ request_id }}", [Attr::int("status", 200)]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;
pub mod marshal;
pub mod middleware;

pub mod prelude {
    pub use crate::appenders::{BufferWriter, FileSink, StreamEngine};
    pub use crate::core::{
        Attr, Attrs, Engine, FormatterConfig, Level, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Middleware, OutputFormat, Record, Result, TimestampFormat,
        Value,
    };
    pub use crate::middleware::Interpolation;
}

pub use appenders::{BufferWriter, FileSink, StreamEngine};
pub use core::{
    Attr, Attrs, Engine, FormatterConfig, Kind, Level, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, Middleware, OutputFormat, Pools, Record, Result,
    TimestampFormat, Value,
};
pub use middleware::Interpolation;
