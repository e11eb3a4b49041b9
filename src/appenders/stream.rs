//! Engine writing marshaled records to a byte stream

use crate::core::{Engine, FormatterConfig, OutputFormat, Pools, Record, Result};
use crate::marshal;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Marshals each record into a pooled buffer and writes it, newline
/// terminated, to the wrapped stream.
///
/// Writes happen on the calling thread; the stream lock is held only for
/// the write itself.
///
/// # Example
///
/// ```
/// use rust_structlog::appenders::StreamEngine;
/// use rust_structlog::core::{Attrs, Engine, Level, OutputFormat, Record};
///
/// let engine = StreamEngine::new(std::io::sink(), OutputFormat::JSON);
/// let record = Record::new(Level::INFO, "hello", Attrs::default());
/// engine.write(&record).unwrap();
/// ```
pub struct StreamEngine {
    out: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
    config: FormatterConfig,
    pools: Arc<Pools>,
}

impl StreamEngine {
    pub fn new(out: impl Write + Send + 'static, format: OutputFormat) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            format,
            config: FormatterConfig::default(),
            pools: Pools::shared(),
        }
    }

    /// Engine writing to standard output
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(io::stdout(), format)
    }

    #[must_use]
    pub fn with_config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_pools(mut self, pools: Arc<Pools>) -> Self {
        self.pools = pools;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }
}

impl Engine for StreamEngine {
    fn write(&self, record: &Record<'_>) -> Result<()> {
        let mut buf = self.pools.buffers().acquire();
        marshal::marshal(self.format, &self.config, &self.pools, record, &mut buf)?;
        buf.push(b'\n');

        self.out.lock().write_all(&buf)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.out.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attr, Attrs, FormatterConfig, Level, LoggerError, TimestampFormat};
    use chrono::{TimeZone, Utc};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().clone()).unwrap()
        }
    }

    fn record<'a>(message: &'a str, attrs: Vec<Attr<'a>>) -> Record<'a> {
        let mut set = Attrs::default();
        set.append(attrs);
        Record::new(Level::INFO, message, set)
            .with_time(Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_writes_newline_terminated_records() {
        let out = SharedBuf::default();
        let engine = StreamEngine::new(out.clone(), OutputFormat::LOGFMT);

        engine.write(&record("first", vec![])).unwrap();
        engine.write(&record("second", vec![Attr::int("n", 2)])).unwrap();

        assert_eq!(
            out.contents(),
            concat!(
                "time=2025-05-01T10:00:00Z level=INFO message=first\n",
                "time=2025-05-01T10:00:00Z level=INFO message=second n=2\n"
            )
        );
    }

    #[test]
    fn test_failed_marshal_writes_nothing() {
        let out = SharedBuf::default();
        let pools = Pools::shared();
        let engine = StreamEngine::new(out.clone(), OutputFormat::JSON).with_pools(Arc::clone(&pools));

        let err = engine
            .write(&record("m", vec![Attr::string("message", "dup")]))
            .unwrap_err();
        assert!(matches!(err, LoggerError::KeyExists(_)));
        assert!(out.contents().is_empty());
        assert_eq!(pools.buffers().idle(), 1);
    }

    #[test]
    fn test_invalid_time_layout_fails_without_output() {
        let out = SharedBuf::default();
        let config = FormatterConfig::default()
            .with_timestamp_format(TimestampFormat::Custom("%Q".to_string()));
        let engine = StreamEngine::new(out.clone(), OutputFormat::JSON).with_config(config);

        let err = engine.write(&record("m", vec![])).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(out.contents().is_empty());
    }

    #[test]
    fn test_unknown_format_fails() {
        let engine = StreamEngine::new(io::sink(), OutputFormat(200));
        assert!(matches!(
            engine.write(&record("m", vec![])),
            Err(LoggerError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_concurrent_writes_do_not_interleave() {
        let out = SharedBuf::default();
        let engine = Arc::new(StreamEngine::new(out.clone(), OutputFormat::JSON));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let msg = format!("thread {} line {}", t, i);
                        engine.write(&record(&msg, vec![])).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let contents = out.contents();
        assert_eq!(contents.lines().count(), 400);
        for line in contents.lines() {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(parsed["level"], "INFO");
        }
    }
}
