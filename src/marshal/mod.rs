//! Record marshalers
//!
//! Every format writes time, level and message first, then the attributes
//! in key order. Encoders write into a caller-supplied byte buffer.

pub mod json;
pub mod logfmt;
pub mod pretty;

pub use json::JsonMarshaler;
pub use logfmt::LogfmtMarshaler;
pub use pretty::PrettyMarshaler;

use crate::core::{
    FormatterConfig, LoggerError, OutputFormat, Pools, Record, Result, Structured, Value,
};
use chrono::{DateTime, Utc};
use std::io::Write;

/// Format-specific record encoder.
///
/// Scratch state borrowed from a pool goes back when the marshaler is dropped.
pub trait Marshaler {
    /// Append `record` to `out`.
    ///
    /// On failure nothing of this record is left in `out`.
    fn marshal(&mut self, record: &Record<'_>, out: &mut Vec<u8>) -> Result<()>;
}

/// Marshal `record` in `format` into `out`.
pub fn marshal(
    format: OutputFormat,
    config: &FormatterConfig,
    pools: &Pools,
    record: &Record<'_>,
    out: &mut Vec<u8>,
) -> Result<()> {
    match format {
        OutputFormat::JSON => JsonMarshaler::new(config, pools).marshal(record, out),
        OutputFormat::LOGFMT => LogfmtMarshaler::new(config).marshal(record, out),
        OutputFormat::PRETTY => PrettyMarshaler::new(config).marshal(record, out),
        other => Err(LoggerError::UnknownFormat(other.to_string())),
    }
}

/// Shortest round-trip decimal; non-finite values use `NaN`, `+Inf`, `-Inf`.
pub(crate) fn write_float(out: &mut Vec<u8>, value: f64) {
    if value.is_nan() {
        out.extend_from_slice(b"NaN");
    } else if value.is_infinite() {
        out.extend_from_slice(if value > 0.0 { b"+Inf" } else { b"-Inf" });
    } else {
        let _ = write!(out, "{}", value);
    }
}

pub(crate) fn write_time(
    out: &mut Vec<u8>,
    config: &FormatterConfig,
    time: &DateTime<Utc>,
) -> Result<()> {
    config.timestamp_format.write(time, out)
}

pub(crate) fn time_text(config: &FormatterConfig, time: &DateTime<Utc>) -> Result<String> {
    let mut buf = Vec::with_capacity(32);
    write_time(&mut buf, config, time)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Encode an `Any` value as compact JSON.
pub(crate) fn write_any(out: &mut Vec<u8>, key: &str, value: &Value<'_>) -> Result<()> {
    match value.structured_value() {
        Some(v) => encode_structured(out, key, v.as_ref()),
        None => {
            out.extend_from_slice(b"null");
            Ok(())
        }
    }
}

fn encode_structured(out: &mut Vec<u8>, key: &str, value: &dyn Structured) -> Result<()> {
    let start = out.len();
    value.write_json(out).map_err(|err| {
        out.truncate(start);
        LoggerError::encode(key, err)
    })
}
