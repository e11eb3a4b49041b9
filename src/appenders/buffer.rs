//! Batching writer with timer-driven flush

use crate::core::{LoggerError, Result};
use crossbeam_channel::{bounded, select, tick, Sender};
use parking_lot::Mutex;
use std::io::{self, Write};
use std::mem;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Flush interval used when none (or zero) is given
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(100);

struct Output {
    sink: Box<dyn Write + Send>,
    spare: Vec<u8>,
}

struct Shared {
    /// `None` once closed
    buffer: Mutex<Option<Vec<u8>>>,
    output: Mutex<Output>,
}

impl Shared {
    fn append(&self, bytes: &[u8]) -> Result<usize> {
        match self.buffer.lock().as_mut() {
            Some(buffer) => {
                buffer.extend_from_slice(bytes);
                Ok(bytes.len())
            }
            None => Err(LoggerError::WriterClosed),
        }
    }

    /// Swap the accumulated bytes out and write them to the sink.
    fn flush(&self) -> io::Result<()> {
        let mut output = self.output.lock();
        {
            let mut buffer = self.buffer.lock();
            match buffer.as_mut() {
                Some(pending) if !pending.is_empty() => mem::swap(pending, &mut output.spare),
                _ => return Ok(()),
            }
        }

        let Output { sink, spare } = &mut *output;
        let result = sink.write_all(spare).and_then(|()| sink.flush());
        spare.clear();
        result
    }

    /// Write out the remaining bytes and drop the buffer.
    fn close(&self) -> io::Result<()> {
        let mut output = self.output.lock();
        let Some(pending) = self.buffer.lock().take() else {
            return Ok(());
        };
        if pending.is_empty() {
            return Ok(());
        }
        output.sink.write_all(&pending).and_then(|()| output.sink.flush())
    }
}

struct Worker {
    stop: Sender<()>,
    handle: thread::JoinHandle<()>,
}

struct Inner {
    shared: Arc<Shared>,
    worker: Mutex<Option<Worker>>,
}

impl Inner {
    fn close(&self) -> Result<()> {
        let Some(worker) = self.worker.lock().take() else {
            return Ok(());
        };

        // Disconnecting the channel is the stop signal; the worker does the
        // final flush before exiting.
        drop(worker.stop);
        if worker.handle.join().is_err() {
            eprintln!("[LOGGER ERROR] Buffer writer flush thread panicked");
        }
        self.shared.close()?;
        Ok(())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            eprintln!("[LOGGER ERROR] Failed to flush buffer writer on drop: {}", e);
        }
    }
}

/// Accumulates writes in memory and flushes them to the sink periodically.
///
/// Flush failures on the timer path are dropped along with their bytes;
/// use an unbuffered sink where delivery matters. Clones share the same
/// buffer, and dropping the last clone closes the writer.
///
/// # Example
///
/// ```
/// use rust_structlog::appenders::BufferWriter;
/// use std::io::Write;
/// use std::time::Duration;
///
/// let mut writer = BufferWriter::new(std::io::sink(), Duration::from_millis(50));
/// writer.write_all(b"line\n").unwrap();
/// writer.close().unwrap();
/// assert!(writer.write_all(b"late\n").is_err());
/// ```
#[derive(Clone)]
pub struct BufferWriter {
    inner: Arc<Inner>,
}

impl BufferWriter {
    /// Start a writer flushing every `interval` (zero selects
    /// [`DEFAULT_FLUSH_INTERVAL`]).
    pub fn new(sink: impl Write + Send + 'static, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_FLUSH_INTERVAL
        } else {
            interval
        };

        let shared = Arc::new(Shared {
            buffer: Mutex::new(Some(Vec::new())),
            output: Mutex::new(Output {
                sink: Box::new(sink),
                spare: Vec::new(),
            }),
        });

        let (stop, stopped) = bounded::<()>(0);
        let worker_shared = Arc::clone(&shared);
        let handle = thread::spawn(move || {
            let ticker = tick(interval);
            loop {
                select! {
                    recv(stopped) -> _ => {
                        let _ = worker_shared.flush();
                        break;
                    }
                    recv(ticker) -> _ => {
                        let _ = worker_shared.flush();
                    }
                }
            }
        });

        Self {
            inner: Arc::new(Inner {
                shared,
                worker: Mutex::new(Some(Worker { stop, handle })),
            }),
        }
    }

    /// Flush what is buffered, stop the flush thread and reject later writes.
    ///
    /// Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        self.inner.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shared.buffer.lock().is_none()
    }

    /// Bytes waiting for the next flush
    pub fn buffered_len(&self) -> usize {
        self.inner
            .shared
            .buffer
            .lock()
            .as_ref()
            .map_or(0, Vec::len)
    }
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .shared
            .append(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::BrokenPipe, e))
    }

    /// Flush immediately, reporting sink errors.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.shared.flush()
    }
}
