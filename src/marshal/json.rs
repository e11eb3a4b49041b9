//! Single-line JSON marshaler

use super::{time_text, write_any, write_float, Marshaler};
use crate::core::{Attr, FormatterConfig, Kind, LoggerError, Pooled, Pools, Record, Result};
use std::collections::HashSet;

/// Writes one JSON object per record.
///
/// Every field name, including the time, level and message keys, must be
/// unique within the record; a repeated name fails the whole record with
/// [`LoggerError::KeyExists`].
pub struct JsonMarshaler<'p> {
    config: &'p FormatterConfig,
    keys: Pooled<'p, HashSet<String>>,
}

impl<'p> JsonMarshaler<'p> {
    pub fn new(config: &'p FormatterConfig, pools: &'p Pools) -> Self {
        Self {
            config,
            keys: pools.keys().acquire(),
        }
    }

    fn write_record(&mut self, record: &Record<'_>, out: &mut Vec<u8>) -> Result<()> {
        let config = self.config;
        out.push(b'{');

        self.write_key(&config.time_key, out)?;
        serde_json::to_writer(&mut *out, &time_text(config, &record.time)?)?;

        self.write_key(&config.level_key, out)?;
        serde_json::to_writer(&mut *out, &record.level)?;

        self.write_key(&config.message_key, out)?;
        serde_json::to_writer(&mut *out, record.message.as_ref())?;

        for attr in &record.attrs {
            self.write_attr(attr, out)?;
        }

        out.push(b'}');
        Ok(())
    }

    fn write_key(&mut self, key: &str, out: &mut Vec<u8>) -> Result<()> {
        if self.keys.contains(key) {
            return Err(LoggerError::KeyExists(key.to_string()));
        }
        self.keys.insert(key.to_string());

        if self.keys.len() > 1 {
            out.push(b',');
        }
        serde_json::to_writer(&mut *out, key)?;
        out.push(b':');
        Ok(())
    }

    fn write_attr(&mut self, attr: &Attr<'_>, out: &mut Vec<u8>) -> Result<()> {
        self.write_key(&attr.key, out)?;

        let value = &attr.value;
        match value.kind() {
            Kind::Any => write_any(out, &attr.key, value)?,
            Kind::Bool => out.extend_from_slice(if value.as_bool() { b"true" } else { b"false" }),
            Kind::Float64 => {
                let f = value.as_float64();
                if f.is_finite() {
                    write_float(out, f);
                } else {
                    out.push(b'"');
                    write_float(out, f);
                    out.push(b'"');
                }
            }
            Kind::Int64 => out.extend_from_slice(value.as_int64().to_string().as_bytes()),
            Kind::Uint64 => out.extend_from_slice(value.as_uint64().to_string().as_bytes()),
            Kind::String => serde_json::to_writer(&mut *out, value.as_str())?,
            Kind::Duration => serde_json::to_writer(&mut *out, value)?,
            Kind::Time => {
                serde_json::to_writer(&mut *out, &time_text(self.config, &value.as_time())?)?
            }
        }
        Ok(())
    }
}

impl Marshaler for JsonMarshaler<'_> {
    fn marshal(&mut self, record: &Record<'_>, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        self.keys.clear();

        let result = self.write_record(record, out);
        if result.is_err() {
            out.truncate(start);
        }
        result
    }
}
