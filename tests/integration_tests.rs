//! Integration tests for the structured logger
//!
//! These tests verify:
//! - End-to-end output in every format
//! - Attribute inheritance and override order
//! - Fallback records for pipeline failures
//! - Batched and file output
//! - Call-site capture
//! - Thread safety

use parking_lot::Mutex;
use rust_structlog::appenders::BufferWriter;
use rust_structlog::core::{Attr, Level, Logger, LoggerConfig, OutputFormat, TimestampFormat};
use rust_structlog::middleware::Interpolation;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// In-memory sink shared between the logger and the test
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("utf-8 output")
    }

    fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    fn json_lines(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).expect("valid JSON line"))
            .collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn json_logger(out: &SharedBuf) -> Logger {
    Logger::builder()
        .format(OutputFormat::JSON)
        .sink(out.clone())
        .build()
        .expect("Failed to build logger")
}

#[derive(Debug, Serialize)]
struct Author {
    name: &'static str,
    books: u32,
}

#[test]
fn test_json_record_layout() {
    let out = SharedBuf::default();
    let logger = json_logger(&out);

    logger.info(
        "saved",
        [
            Attr::string("zeta", "last"),
            Attr::int("count", 3),
            Attr::bool("alpha", true),
            Attr::duration("took", Duration::from_millis(1500)),
            Attr::any("author", Author { name: "Ada", books: 2 }),
        ],
    );

    let line = &out.lines()[0];
    assert!(line.starts_with(r#"{"time":""#), "{}", line);

    // Attributes follow the fixed fields in key order
    let attrs_start = line.find(r#""alpha""#).unwrap();
    let tail = &line[attrs_start..];
    assert_eq!(
        tail,
        r#""alpha":true,"author":{"name":"Ada","books":2},"count":3,"took":"1.5s","zeta":"last"}"#
    );

    let parsed = &out.json_lines()[0];
    assert_eq!(parsed["level"], "INFO");
    assert_eq!(parsed["message"], "saved");
}

#[test]
fn test_message_with_newlines_stays_on_one_line() {
    let out = SharedBuf::default();
    let logger = json_logger(&out);

    logger.info("User login\nERROR fake record\nINFO continuation", []);

    let lines = out.lines();
    assert_eq!(lines.len(), 1, "Log should be a single line, not multiple");
    assert!(lines[0].contains("\\n"));
    assert_eq!(
        out.json_lines()[0]["message"],
        "User login\nERROR fake record\nINFO continuation"
    );
}

#[test]
fn test_logfmt_output() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::LOGFMT)
        .time("ts", TimestampFormat::Custom("%Y".to_string()))
        .sink(out.clone())
        .build()
        .unwrap();

    logger.warn("disk low", [Attr::string("mount", "/var"), Attr::float64("free", 0.05)]);

    let line = &out.lines()[0];
    let year = chrono::Utc::now().format("%Y").to_string();
    assert_eq!(
        *line,
        format!("ts={} level=WARN message=\"disk low\" free=0.05 mount=/var", year)
    );
}

#[test]
fn test_pretty_output() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::PRETTY)
        .sink(out.clone())
        .build()
        .unwrap();

    let err = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
    logger.error(&err, "upstream down", [Attr::string("host", "db-1")]);

    let contents = out.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert!(lines[0].starts_with("[ "), "{}", lines[0]);
    assert!(lines[1].contains("ERROR"), "{}", lines[1]);
    assert!(lines[1].ends_with(" upstream down"), "{}", lines[1]);
    assert_eq!(lines[2], "  error: connection refused");
    assert_eq!(lines[3], "  host: db-1");
}

#[test]
fn test_child_logger_attrs() {
    let out = SharedBuf::default();
    let base = Logger::builder()
        .format(OutputFormat::JSON)
        .sink(out.clone())
        .attrs([Attr::string("service", "api"), Attr::string("instance", "default")])
        .build()
        .unwrap();

    let child = base.with([Attr::string("instance", "local")]);
    child.info("from child", [Attr::string("service", "override")]);
    base.info("from base", []);

    let records = out.json_lines();
    assert_eq!(records[0]["instance"], "local");
    assert_eq!(records[0]["service"], "override");
    assert_eq!(records[1]["instance"], "default");
    assert_eq!(records[1]["service"], "api");
}

#[test]
fn test_interpolation_end_to_end() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .middleware(Interpolation)
        .sink(out.clone())
        .build()
        .unwrap()
        .with([Attr::string("instance", "local")]);

    logger.warn("warn from \"{{ instance }}\" instance", []);
    logger.info("{{ user }} bought {{ count }} items", [
        Attr::string("user", "ada"),
        Attr::int("count", 3),
    ]);
    logger.info("unknown {{ nobody }} stays", []);

    let records = out.json_lines();
    assert_eq!(records[0]["message"], "warn from \"local\" instance");
    assert_eq!(records[1]["message"], "ada bought 3 items");
    assert_eq!(records[2]["message"], "unknown {{ nobody }} stays");
}

#[test]
fn test_malformed_template_emits_fallback_record() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .middleware(Interpolation)
        .sink(out.clone())
        .build()
        .unwrap();

    logger.info("Hello {{ name {{ key!", [Attr::string("name", "world")]);

    let records = out.json_lines();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["message"], "Hello {{ name {{ key!");
    assert_eq!(records[1]["level"], "ERROR");
    assert_eq!(records[1]["message"], "indirect open key at 14");
    assert_eq!(logger.metrics().fallback_count(), 1);
}

#[test]
fn test_duplicate_key_emits_fallback_record() {
    let out = SharedBuf::default();
    let logger = json_logger(&out);

    logger.info("shadowed", [Attr::string("level", "custom")]);

    let records = out.json_lines();
    assert_eq!(records.len(), 1, "the failed record must not be written");
    assert_eq!(records[0]["level"], "ERROR");
    assert_eq!(records[0]["message"], "key exists: \"level\"");
    assert_eq!(logger.metrics().failed_count(), 1);
}

#[test]
fn test_level_filtering() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .min_level(Level::WARN)
        .sink(out.clone())
        .build()
        .unwrap();

    logger.trace("t", []);
    logger.debug("d", []);
    logger.info("i", []);
    logger.warn("w", []);
    logger.log(Level(6), "between warn and error", []);

    let records = out.json_lines();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["level"], "WARN");
    assert_eq!(records[1]["level"], "Level<6>");
    assert_eq!(logger.metrics().filtered_count(), 3);
}

#[test]
fn test_buffered_logging() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::LOGFMT)
        .buffered(Duration::from_secs(3600))
        .sink(out.clone())
        .build()
        .unwrap();

    for i in 0..20 {
        logger.info("batched", [Attr::int("i", i)]);
    }
    assert!(out.contents().is_empty(), "records must wait for the flush");

    logger.flush().expect("Failed to flush");
    assert_eq!(out.lines().len(), 20);
}

#[test]
fn test_buffered_logger_flushes_on_drop() {
    let out = SharedBuf::default();
    {
        let logger = Logger::builder()
            .buffered(Duration::from_secs(3600))
            .sink(out.clone())
            .build()
            .unwrap();
        let child = logger.with([Attr::string("scope", "child")]);
        child.info("kept until drop", []);
    }
    assert!(out.contents().contains("kept until drop"));
}

#[test]
fn test_buffer_writer_as_stream_target() {
    let out = SharedBuf::default();
    let writer = BufferWriter::new(out.clone(), Duration::from_millis(10));
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .sink(writer.clone())
        .build()
        .unwrap();

    logger.info("ticked", []);

    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while out.contents().is_empty() && std::time::Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(out.json_lines()[0]["message"], "ticked");

    writer.close().unwrap();
    logger.info("after close", []);
    assert_eq!(logger.metrics().failed_count(), 1);
}

#[test]
fn test_file_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    {
        let logger = Logger::builder()
            .format(OutputFormat::JSON)
            .file(&log_file)
            .build()
            .expect("Failed to open log file");
        logger.info("first", []);
        logger.info("second", [Attr::uint64("bytes", 1024)]);
        logger.flush().unwrap();
    }

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].ends_with(r#""message":"second","bytes":1024}"#), "{}", lines[1]);
}

#[test]
fn test_file_in_missing_directory_fails_to_build() {
    let temp_dir = TempDir::new().unwrap();
    let result = Logger::builder()
        .file(temp_dir.path().join("missing").join("app.log"))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_caller_capture() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .caller("caller", 0)
        .sink(out.clone())
        .build()
        .unwrap();

    logger.info("here", []);

    let record = &out.json_lines()[0];
    let caller = record["caller"].as_str().unwrap();
    assert!(caller.contains("integration_tests.rs:"), "{}", caller);
    assert!(caller.ends_with("test_caller_capture"), "{}", caller);
}

#[inline(never)]
fn log_through_wrapper(logger: &Logger) {
    logger.with_skip(1).info("wrapped", []);
}

#[test]
fn test_caller_skip_reports_wrapper_caller() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .caller("caller", 0)
        .sink(out.clone())
        .build()
        .unwrap();

    log_through_wrapper(&logger);

    let caller = out.json_lines()[0]["caller"].as_str().unwrap().to_string();
    assert!(
        caller.ends_with("test_caller_skip_reports_wrapper_caller"),
        "{}",
        caller
    );
}

#[test]
fn test_logger_from_config() {
    let out = SharedBuf::default();
    let config = LoggerConfig::from_json(
        r#"{
            "format": "TEXT",
            "level": "INFO",
            "message_key": "msg",
            "time_format": {"Custom": "%H"}
        }"#,
    )
    .unwrap();

    let logger = Logger::builder()
        .config(config)
        .sink(out.clone())
        .build()
        .unwrap();
    logger.debug("hidden", []);
    logger.info("shown", []);

    let lines = out.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" level=INFO msg=shown"), "{}", lines[0]);
}

#[test]
fn test_concurrent_logging() {
    let out = SharedBuf::default();
    let logger = Logger::builder()
        .format(OutputFormat::JSON)
        .buffered(Duration::from_millis(5))
        .sink(out.clone())
        .build()
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = logger.with([Attr::int("thread", t)]);
            thread::spawn(move || {
                for i in 0..250 {
                    logger.info("worker", [Attr::int("i", i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.flush().unwrap();

    let records = out.json_lines();
    assert_eq!(records.len(), 2000);
    assert_eq!(logger.metrics().total_logged(), 2000);
    for thread in 0..8 {
        let count = records.iter().filter(|r| r["thread"] == thread).count();
        assert_eq!(count, 250);
    }
}
