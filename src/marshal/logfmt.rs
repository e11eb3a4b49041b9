//! Logfmt marshaler

use super::{write_any, write_float, write_time, Marshaler};
use crate::core::{Attr, FormatterConfig, Kind, Record, Result};

/// Writes space-separated `key=value` pairs.
///
/// Keys are not checked for collisions. A string value is quoted only when
/// it contains a space; `Any` values are always quoted JSON text.
pub struct LogfmtMarshaler<'p> {
    config: &'p FormatterConfig,
}

impl<'p> LogfmtMarshaler<'p> {
    pub fn new(config: &'p FormatterConfig) -> Self {
        Self { config }
    }

    fn write_record(&self, record: &Record<'_>, out: &mut Vec<u8>, start: usize) -> Result<()> {
        write_key(out, start, &self.config.time_key);
        write_time(out, self.config, &record.time)?;

        write_key(out, start, &self.config.level_key);
        write_string(out, &record.level.to_string());

        write_key(out, start, &self.config.message_key);
        write_string(out, &record.message);

        for attr in &record.attrs {
            self.write_attr(attr, out, start)?;
        }
        Ok(())
    }

    fn write_attr(&self, attr: &Attr<'_>, out: &mut Vec<u8>, start: usize) -> Result<()> {
        write_key(out, start, &attr.key);

        let value = &attr.value;
        match value.kind() {
            Kind::Any => {
                let mut json = Vec::new();
                write_any(&mut json, &attr.key, value)?;
                write_quoted(out, &String::from_utf8_lossy(&json));
            }
            Kind::Bool => out.extend_from_slice(if value.as_bool() { b"true" } else { b"false" }),
            Kind::Float64 => write_float(out, value.as_float64()),
            Kind::Int64 => out.extend_from_slice(value.as_int64().to_string().as_bytes()),
            Kind::Uint64 => out.extend_from_slice(value.as_uint64().to_string().as_bytes()),
            Kind::String => write_string(out, value.as_str()),
            Kind::Duration => out.extend_from_slice(value.to_string().as_bytes()),
            Kind::Time => write_time(out, self.config, &value.as_time())?,
        }
        Ok(())
    }
}

impl Marshaler for LogfmtMarshaler<'_> {
    fn marshal(&mut self, record: &Record<'_>, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let result = self.write_record(record, out, start);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }
}

fn write_key(out: &mut Vec<u8>, start: usize, key: &str) {
    if out.len() > start {
        out.push(b' ');
    }
    out.extend_from_slice(key.as_bytes());
    out.push(b'=');
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    if s.contains(' ') {
        write_quoted(out, s);
    } else {
        out.extend_from_slice(s.as_bytes());
    }
}

fn write_quoted(out: &mut Vec<u8>, s: &str) {
    out.push(b'"');
    for b in s.bytes() {
        if b == b'"' || b == b'\\' {
            out.push(b'\\');
        }
        out.push(b);
    }
    out.push(b'"');
}
