//! Output format selector for log records
//!
//! Provides different output formats for log records:
//! - Pretty: Multi-line human-readable layout (default)
//! - Json: Single-line JSON object
//! - Logfmt: Space-separated `key=value` pairs

use super::error::LoggerError;
use super::names::NameTable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static FORMAT_NAMES: LazyLock<NameTable> = LazyLock::new(|| {
    NameTable::new(&[
        (OutputFormat::PRETTY.0 as i64, "PRETTY"),
        (OutputFormat::JSON.0 as i64, "JSON"),
        (OutputFormat::LOGFMT.0 as i64, "TEXT"),
    ])
});

/// Output format for log records
///
/// Like [`Level`](super::Level), formats are numeric with a runtime
/// overridable name table, so configuration files may use custom names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputFormat(pub u8);

impl OutputFormat {
    /// Human-readable multi-line layout
    ///
    /// Example:
    /// ```text
    /// [ 2025-01-08 10:30:45 ]	src/main.rs:12 app::main
    ///  INFO  Request processed
    ///   status: 200
    /// ```
    pub const PRETTY: OutputFormat = OutputFormat(0);

    /// JSON format for machine processing
    ///
    /// Example: `{"time":"2025-01-08T10:30:45Z","level":"INFO","message":"Request processed"}`
    pub const JSON: OutputFormat = OutputFormat(1);

    /// Logfmt format (key=value pairs), named `TEXT` in configuration
    ///
    /// Example: `time=2025-01-08T10:30:45Z level=INFO message="Request processed"`
    pub const LOGFMT: OutputFormat = OutputFormat(2);

    /// Register or override the name of a format value.
    ///
    /// A name already held by another format moves to `format`.
    pub fn set_name(format: OutputFormat, name: &str) {
        FORMAT_NAMES.set(format.0 as i64, name);
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::PRETTY
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        FORMAT_NAMES.with_name(self.0 as i64, |name| match name {
            Some(name) => f.write_str(name),
            None => write!(f, "OutputFormat<{}>", self.0),
        })
    }
}

impl FromStr for OutputFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FORMAT_NAMES
            .lookup(s)
            .and_then(|value| u8::try_from(value).ok())
            .map(OutputFormat)
            .ok_or_else(|| LoggerError::UnknownFormat(s.to_string()))
    }
}

impl Serialize for OutputFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
