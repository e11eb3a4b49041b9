//! Main logger implementation

use super::{
    attr::{Attr, Attrs, CALLER_KEY},
    caller,
    engine::{Engine, Middleware},
    error::{LoggerError, Result},
    log_level::Level,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    pool::Pools,
    record::Record,
    timestamp::{FormatterConfig, TimestampFormat},
};
use crate::appenders::{BufferWriter, FileSink, StreamEngine};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Frames between the public logging methods and `caller::take`
const PIPELINE_DEPTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CallerSite {
    key: String,
    skip: usize,
}

/// Structured logger.
///
/// Each call builds a [`Record`] from the inherited and call attributes,
/// runs it through the middlewares and hands it to the engine. Failures
/// anywhere along the way are collected and reported as one extra ERROR
/// record through the same engine.
///
/// Cloning is cheap; clones share the engine, pools and metrics.
#[derive(Clone)]
pub struct Logger {
    engine: Arc<dyn Engine>,
    middlewares: Vec<Arc<dyn Middleware>>,
    min_level: Level,
    attrs: Attrs<'static>,
    caller: Option<CallerSite>,
    pools: Arc<Pools>,
    /// Metrics for observability (written, failed, fallback, filtered)
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger over `engine` accepting DEBUG and above.
    #[must_use]
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        let pools = Pools::shared();
        Self {
            engine,
            middlewares: Vec::new(),
            min_level: Level::default(),
            attrs: pools.attrs(),
            caller: None,
            pools,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_min_level(&mut self, level: Level) {
        self.min_level = level;
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    /// Child logger adding `attrs` to every record.
    ///
    /// Later attributes with the same key replace inherited ones.
    #[must_use]
    pub fn with<'a, I>(&self, attrs: I) -> Logger
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        let mut child = self.clone();
        child.attrs.append(attrs.into_iter().map(Attr::into_owned));
        child
    }

    /// Child logger capturing the call site `skip` frames further up.
    ///
    /// Useful for wrappers around the logger; has no effect unless caller
    /// capture is enabled.
    #[must_use]
    pub fn with_skip(&self, skip: usize) -> Logger {
        let mut child = self.clone();
        if let Some(site) = child.caller.as_mut() {
            site.skip += skip;
        }
        child
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    pub fn flush(&self) -> Result<()> {
        self.engine.flush()
    }

    #[inline(never)]
    pub fn log<'a, I>(&self, level: Level, message: impl Into<Cow<'a, str>>, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(level, message.into(), attrs, None);
    }

    #[inline(never)]
    pub fn trace<'a, I>(&self, message: impl Into<Cow<'a, str>>, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(Level::TRACE, message.into(), attrs, None);
    }

    #[inline(never)]
    pub fn debug<'a, I>(&self, message: impl Into<Cow<'a, str>>, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(Level::DEBUG, message.into(), attrs, None);
    }

    #[inline(never)]
    pub fn info<'a, I>(&self, message: impl Into<Cow<'a, str>>, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(Level::INFO, message.into(), attrs, None);
    }

    #[inline(never)]
    pub fn warn<'a, I>(&self, message: impl Into<Cow<'a, str>>, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(Level::WARN, message.into(), attrs, None);
    }

    /// Log at ERROR with the error text under the `error` key.
    #[inline(never)]
    pub fn error<'a, I>(&self, err: &dyn StdError, message: impl Into<Cow<'a, str>>, attrs: I)
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(Level::ERROR, message.into(), attrs, Some(err));
    }

    /// Log at FATAL, flush and exit the process with status 1.
    #[inline(never)]
    pub fn fatal<'a, I>(&self, err: &dyn StdError, message: impl Into<Cow<'a, str>>, attrs: I) -> !
    where
        I: IntoIterator<Item = Attr<'a>>,
    {
        self.write_record(Level::FATAL, message.into(), attrs, Some(err));
        self.terminate()
    }

    #[inline(never)]
    fn write_record<'a, I>(
        &self,
        level: Level,
        message: Cow<'a, str>,
        attrs: I,
        err: Option<&dyn StdError>,
    ) where
        I: IntoIterator<Item = Attr<'a>>,
    {
        if !self.enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let mut errors = Vec::new();
        let mut set = self.pools.attrs();
        for attr in &self.attrs {
            set.push(attr.clone());
        }
        set.append(attrs);
        if let Some(err) = err {
            set.push(Attr::err(err));
        }
        if let Some(site) = &self.caller {
            match caller::take(self.pools.callers(), site.skip + PIPELINE_DEPTH) {
                Ok(location) => set.push(Attr::string(site.key.clone(), location)),
                Err(e) => errors.push(e),
            }
        }

        let mut record = Record::new(level, message, set);
        for middleware in &self.middlewares {
            if let Err(e) = middleware.handle(&mut record) {
                errors.push(e);
            }
        }

        match self.engine.write(&record) {
            Ok(()) => {
                self.metrics.record_logged();
            }
            Err(e) => errors.push(e),
        }
        record.dispose();

        if !errors.is_empty() {
            self.metrics.record_failed();
            self.write_fallback(LoggerError::joined(errors));
        }

        if level >= Level::FATAL {
            self.terminate();
        }
    }

    /// Report a pipeline failure as an ERROR record; best effort.
    fn write_fallback(&self, err: LoggerError) {
        let record = Record::new(Level::ERROR, err.to_string(), self.pools.attrs());
        match self.engine.write(&record) {
            Ok(()) => {
                self.metrics.record_fallback();
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to write fallback record: {} (original error: {})",
                    e, err
                );
            }
        }
    }

    fn terminate(&self) -> ! {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(1)
    }
}

impl Default for Logger {
    /// Pretty records on standard output.
    fn default() -> Self {
        Self::new(Arc::new(StreamEngine::stdout(OutputFormat::PRETTY)))
    }
}

/// Serializable logger configuration
///
/// # Example
///
/// ```
/// use rust_structlog::{Level, LoggerConfig, OutputFormat};
///
/// let config = LoggerConfig::from_json(r#"{"format":"JSON","level":"WARN"}"#).unwrap();
/// assert_eq!(config.format, OutputFormat::JSON);
/// assert_eq!(config.level, Level::WARN);
/// assert_eq!(config.time_key, "time");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: OutputFormat,
    /// Minimum enabled level
    pub level: Level,
    pub level_key: String,
    /// Attach the call site to every record
    pub add_caller: bool,
    pub caller_key: String,
    /// Extra frames to skip when capturing the call site
    pub caller_skip: usize,
    pub time_key: String,
    pub time_format: TimestampFormat,
    pub message_key: String,
    /// Batch writes and flush at this interval; unset writes directly
    pub flush_interval_ms: Option<u64>,
    /// Colorize levels in the pretty layout
    pub colors: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let keys = FormatterConfig::default();
        Self {
            format: OutputFormat::default(),
            level: Level::default(),
            level_key: keys.level_key,
            add_caller: false,
            caller_key: keys.caller_key,
            caller_skip: 0,
            time_key: keys.time_key,
            time_format: keys.timestamp_format,
            message_key: keys.message_key,
            flush_interval_ms: None,
            colors: false,
        }
    }
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.time_format.validate()?;

        for (name, key) in [
            ("level_key", &self.level_key),
            ("caller_key", &self.caller_key),
            ("time_key", &self.time_key),
            ("message_key", &self.message_key),
        ] {
            if key.is_empty() {
                return Err(LoggerError::config("LoggerConfig", format!("{} is empty", name)));
            }
        }

        if self.flush_interval_ms == Some(0) {
            return Err(LoggerError::config(
                "LoggerConfig",
                "flush_interval_ms must be positive",
            ));
        }
        Ok(())
    }

    /// Marshaler settings derived from this configuration
    pub fn formatter(&self) -> FormatterConfig {
        FormatterConfig::new()
            .with_timestamp_format(self.time_format.clone())
            .with_time_key(self.time_key.clone())
            .with_level_key(self.level_key.clone())
            .with_message_key(self.message_key.clone())
            .with_caller_key(self.caller_key.clone())
            .with_colors(self.colors)
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_structlog::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .min_level(Level::INFO)
///     .format(OutputFormat::JSON)
///     .sink(std::io::sink())
///     .buffered(Duration::from_millis(50))
///     .middleware(Interpolation)
///     .attrs([Attr::string("service", "api")])
///     .build()
///     .unwrap();
///
/// logger.info("listening on {{ port }}", [Attr::int("port", 8080)]);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<Box<dyn Write + Send>>,
    file: Option<PathBuf>,
    engine: Option<Arc<dyn Engine>>,
    middlewares: Vec<Arc<dyn Middleware>>,
    attrs: Vec<Attr<'static>>,
    pools: Option<Arc<Pools>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
            file: None,
            engine: None,
            middlewares: Vec::new(),
            attrs: Vec::new(),
            pools: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time(mut self, key: impl Into<String>, format: TimestampFormat) -> Self {
        self.config.time_key = key.into();
        self.config.time_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_key(mut self, key: impl Into<String>) -> Self {
        self.config.message_key = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_key(mut self, key: impl Into<String>) -> Self {
        self.config.level_key = key.into();
        self
    }

    /// Write to `sink` instead of standard output
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: impl Write + Send + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Append to the file at `path`, opened by [`LoggerBuilder::build`]
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Batch writes through a [`BufferWriter`] flushing every `interval`
    #[must_use = "builder methods return a new value"]
    pub fn buffered(mut self, interval: Duration) -> Self {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self.config.flush_interval_ms = Some(millis.max(1));
        self
    }

    /// Attach the call site under `key`, skipping `skip` extra frames
    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, key: impl Into<String>, skip: usize) -> Self {
        self.config.add_caller = true;
        self.config.caller_key = key.into();
        self.config.caller_skip = skip;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Attributes added to every record
    #[must_use = "builder methods return a new value"]
    pub fn attrs<I>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = Attr<'static>>,
    {
        self.attrs.extend(attrs);
        self
    }

    /// Use a custom engine; sink, file, format and buffering are ignored
    #[must_use = "builder methods return a new value"]
    pub fn engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn pools(mut self, pools: Arc<Pools>) -> Self {
        self.pools = Some(pools);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        let config = self.config;
        config.validate()?;

        let pools = self.pools.unwrap_or_else(Pools::shared);
        let engine: Arc<dyn Engine> = match self.engine {
            Some(engine) => engine,
            None => {
                let sink: Box<dyn Write + Send> = match (self.sink, self.file) {
                    (Some(sink), _) => sink,
                    (None, Some(path)) => Box::new(FileSink::new(path)?),
                    (None, None) => Box::new(io::stdout()),
                };
                let sink: Box<dyn Write + Send> = match config.flush_interval_ms {
                    Some(ms) => Box::new(BufferWriter::new(sink, Duration::from_millis(ms))),
                    None => sink,
                };
                Arc::new(
                    StreamEngine::new(sink, config.format)
                        .with_config(config.formatter())
                        .with_pools(Arc::clone(&pools)),
                )
            }
        };

        let mut attrs = pools.attrs();
        attrs.append(self.attrs);

        let caller = config.add_caller.then(|| CallerSite {
            key: if config.caller_key.is_empty() {
                CALLER_KEY.to_string()
            } else {
                config.caller_key.clone()
            },
            skip: config.caller_skip,
        });

        Ok(Logger {
            engine,
            middlewares: self.middlewares,
            min_level: config.level,
            attrs,
            caller,
            pools,
            metrics: Arc::new(LoggerMetrics::new()),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
