//! Human-readable multi-line marshaler

use super::{write_any, write_float, write_time, Marshaler};
use crate::core::{Attr, FormatterConfig, Kind, Level, Record, Result};
use std::io::Write;

const TIME_LAYOUT: &str = "[ %Y-%m-%d %H:%M:%S ]";

/// Writes a record as:
///
/// ```text
/// [ 2025-05-01 10:00:00 ]	core/server.rs:42 app::server::run
///  INFO  listening
///   port: 8080
/// ```
///
/// The caller attribute is printed on the timestamp line and skipped among
/// the attribute lines. Attribute encoding errors are printed under the
/// attribute and never fail the record.
pub struct PrettyMarshaler<'p> {
    config: &'p FormatterConfig,
}

impl<'p> PrettyMarshaler<'p> {
    pub fn new(config: &'p FormatterConfig) -> Self {
        Self { config }
    }

    fn write_level(&self, out: &mut Vec<u8>, level: Level) {
        out.push(b' ');
        #[cfg(feature = "console")]
        if self.config.colors {
            use colored::Colorize;
            let _ = write!(out, "{}", level.to_string().color(level.color_code()).bold());
            out.push(b' ');
            return;
        }
        let _ = write!(out, "{}", level);
        out.push(b' ');
    }

    fn write_attr(&self, out: &mut Vec<u8>, attr: &Attr<'_>) {
        out.extend_from_slice(b"  ");
        out.extend_from_slice(attr.key.as_bytes());
        out.extend_from_slice(b": ");

        let result = self.write_value(out, attr);
        out.push(b'\n');

        if let Err(err) = result {
            let _ = writeln!(out, "    {}", err);
        }
    }

    fn write_value(&self, out: &mut Vec<u8>, attr: &Attr<'_>) -> Result<()> {
        let value = &attr.value;
        match value.kind() {
            Kind::Any => write_any(out, &attr.key, value)?,
            Kind::Float64 => write_float(out, value.as_float64()),
            Kind::String => out.extend_from_slice(value.as_str().as_bytes()),
            Kind::Time => write_time(out, self.config, &value.as_time())?,
            _ => {
                let _ = write!(out, "{}", value);
            }
        }
        Ok(())
    }
}

impl Marshaler for PrettyMarshaler<'_> {
    fn marshal(&mut self, record: &Record<'_>, out: &mut Vec<u8>) -> Result<()> {
        let caller_key = self.config.caller_key.as_str();

        let _ = write!(out, "{}", record.time.format(TIME_LAYOUT));
        out.push(b'\t');
        if let Some(caller) = record.attrs.search(caller_key) {
            let mut text = String::new();
            caller.value.write_text(&mut text);
            out.extend_from_slice(text.as_bytes());
        }
        out.push(b'\n');

        self.write_level(out, record.level);
        out.push(b' ');
        out.extend_from_slice(record.message.as_bytes());
        out.push(b'\n');

        for attr in record.attrs.iter().filter(|a| a.key != caller_key) {
            self.write_attr(out, attr);
        }
        Ok(())
    }
}
