//! Engine and middleware traits for the write pipeline

use super::{error::Result, record::Record};

/// Sink that serializes a record and writes it out.
pub trait Engine: Send + Sync {
    fn write(&self, record: &Record<'_>) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}

/// Record-transforming step run before the engine.
///
/// An error does not stop the chain; the logger collects it and keeps going.
pub trait Middleware: Send + Sync {
    fn handle(&self, record: &mut Record<'_>) -> Result<()>;
    fn name(&self) -> &str;
}
