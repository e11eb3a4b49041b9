//! Logging macros for ergonomic record construction.
//!
//! A bare string literal is passed through untouched, so `{{ key }}`
//! placeholders reach the interpolation middleware intact. Format arguments
//! go through `format!`. Attributes follow a `;` as `"key" => value` pairs.
//!
//! # Examples
//!
//! ```
//! use rust_structlog::prelude::*;
//! use rust_structlog::info;
//!
//! let logger = Logger::builder().sink(std::io::sink()).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With attributes
//! info!(logger, "User {{ user_id }} logged in"; "user_id" => 42, "action" => "login");
//! ```

/// Log a record at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().sink(std::io::sink()).build().unwrap();
/// use rust_structlog::log;
/// log!(logger, Level::INFO, "Simple message");
/// log!(logger, Level::ERROR, "Error code: {}", 500);
/// log!(logger, Level::WARN, "slow query"; "table" => "users", "ms" => 1200);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:literal) => {
        $logger.log($level, $msg, ::core::iter::empty::<$crate::core::Attr>())
    };
    ($logger:expr, $level:expr, $msg:literal; $($key:literal => $value:expr),+ $(,)?) => {
        $logger.log($level, $msg, [$($crate::core::Attr::new($key, $value)),+])
    };
    ($logger:expr, $level:expr, $fmt:literal, $($arg:expr),+ $(,)?) => {
        $logger.log(
            $level,
            format!($fmt, $($arg),+),
            ::core::iter::empty::<$crate::core::Attr>(),
        )
    };
    ($logger:expr, $level:expr, $fmt:literal, $($arg:expr),+; $($key:literal => $value:expr),+ $(,)?) => {
        $logger.log(
            $level,
            format!($fmt, $($arg),+),
            [$($crate::core::Attr::new($key, $value)),+],
        )
    };
}

/// Log a trace-level record.
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().min_level(Level::TRACE).sink(std::io::sink()).build().unwrap();
/// use rust_structlog::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level record.
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().sink(std::io::sink()).build().unwrap();
/// use rust_structlog::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level record.
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().sink(std::io::sink()).build().unwrap();
/// use rust_structlog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100; "batch" => 7);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level record.
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().sink(std::io::sink()).build().unwrap();
/// use rust_structlog::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::WARN, $($arg)+)
    };
}

/// Log an error-level record.
///
/// Use [`Logger::error`](crate::Logger::error) to attach an error value.
///
/// # Examples
///
/// ```
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().sink(std::io::sink()).build().unwrap();
/// use rust_structlog::error;
/// error!(logger, "Connection failed");
/// error!(logger, "Failed to open file: {}", "config.toml"; "attempt" => 3);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::ERROR, $($arg)+)
    };
}

/// Log a fatal-level record, flush and exit the process.
///
/// # Examples
///
/// ```no_run
/// # use rust_structlog::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use rust_structlog::fatal;
/// fatal!(logger, "Critical system failure");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Level::FATAL, $($arg)+)
    };
}
