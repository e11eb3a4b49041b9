//! Core logger types and traits

pub mod attr;
pub mod caller;
pub mod engine;
pub mod error;
pub mod log_level;
pub mod logger;
pub mod metrics;
mod names;
pub mod output_format;
pub mod pool;
pub mod record;
pub mod timestamp;
pub mod value;

pub use attr::{Attr, Attrs, CALLER_KEY, ERROR_KEY};
pub use caller::Caller;
pub use engine::{Engine, Middleware};
pub use error::{LoggerError, Result};
pub use log_level::Level;
pub use logger::{Logger, LoggerBuilder, LoggerConfig};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use pool::{AttrsPool, Pool, Pooled, Pools};
pub use record::Record;
pub use timestamp::{FormatterConfig, TimestampFormat};
pub use value::{format_duration, Kind, Structured, Value};
