//! Sink implementations

pub mod buffer;
pub mod file;
pub mod stream;

pub use buffer::{BufferWriter, DEFAULT_FLUSH_INTERVAL};
pub use file::FileSink;
pub use stream::StreamEngine;
