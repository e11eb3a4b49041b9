//! Timestamp formatting utilities
//!
//! Provides configurable timestamp layouts for record timestamps and
//! `Time` attribute values, plus the shared record-key configuration used
//! by every marshaler.

use super::attr::CALLER_KEY;
use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Timestamp layout options
///
/// # Examples
///
/// ```
/// use rust_structlog::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
/// assert_eq!(TimestampFormat::Rfc3339.format(&time), "2025-05-01T10:00:00Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with whole seconds: `2025-01-08T10:30:45Z`
    ///
    /// This is the default layout.
    #[default]
    Rfc3339,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    ///
    /// Provides higher precision for ordering concurrent records.
    Iso8601Micros,

    /// Custom strftime layout
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_structlog::core::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// assert!(format.validate().is_ok());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp into a new string.
    ///
    /// An invalid custom layout yields an empty string; use
    /// [`TimestampFormat::validate`] to reject such layouts up front.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        let mut out = Vec::with_capacity(32);
        match self.write(datetime, &mut out) {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => String::new(),
        }
    }

    /// Append the formatted timestamp to `out`.
    pub fn write(&self, datetime: &DateTime<Utc>, out: &mut Vec<u8>) -> Result<()> {
        match self {
            TimestampFormat::Rfc3339 => {
                out.extend_from_slice(datetime.to_rfc3339_opts(SecondsFormat::Secs, true).as_bytes())
            }
            TimestampFormat::Iso8601 => {
                out.extend_from_slice(datetime.to_rfc3339_opts(SecondsFormat::Millis, true).as_bytes())
            }
            TimestampFormat::Iso8601Micros => {
                out.extend_from_slice(datetime.to_rfc3339_opts(SecondsFormat::Micros, true).as_bytes())
            }
            TimestampFormat::Custom(layout) => {
                // a failing Display panics inside io::Write
                self.validate()?;
                write!(out, "{}", datetime.format(layout))?
            }
        }
        Ok(())
    }

    /// Reject custom layouts chrono cannot render.
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(layout) = self {
            if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("invalid strftime layout '{}'", layout),
                ));
            }
        }
        Ok(())
    }
}

/// Record keys and layout shared by the marshalers
///
/// # Examples
///
/// ```
/// use rust_structlog::core::{FormatterConfig, TimestampFormat};
///
/// let config = FormatterConfig::new()
///     .with_timestamp_format(TimestampFormat::Iso8601Micros)
///     .with_message_key("msg");
/// assert_eq!(config.message_key, "msg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Layout for the record timestamp and `Time` attributes
    pub timestamp_format: TimestampFormat,
    pub time_key: String,
    pub level_key: String,
    pub message_key: String,
    /// Attribute key the pretty layout prints on the timestamp line
    pub caller_key: String,
    /// Colorize the level in the pretty layout
    pub colors: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            time_key: "time".to_string(),
            level_key: "level".to_string(),
            message_key: "message".to_string(),
            caller_key: CALLER_KEY.to_string(),
            colors: false,
        }
    }
}

impl FormatterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_time_key(mut self, key: impl Into<String>) -> Self {
        self.time_key = key.into();
        self
    }

    #[must_use]
    pub fn with_level_key(mut self, key: impl Into<String>) -> Self {
        self.level_key = key.into();
        self
    }

    #[must_use]
    pub fn with_message_key(mut self, key: impl Into<String>) -> Self {
        self.message_key = key.into();
        self
    }

    #[must_use]
    pub fn with_caller_key(mut self, key: impl Into<String>) -> Self {
        self.caller_key = key.into();
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }
}
