//! Log record definition

use super::attr::Attrs;
use super::log_level::Level;
use chrono::{DateTime, Utc};
use std::borrow::Cow;

/// One log event.
///
/// The attribute set is pooled storage; disposing (or dropping) the record
/// returns it.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub time: DateTime<Utc>,
    pub level: Level,
    pub message: Cow<'a, str>,
    pub attrs: Attrs<'a>,
}

impl<'a> Record<'a> {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<Cow<'a, str>>, attrs: Attrs<'a>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            attrs,
        }
    }

    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    pub fn dispose(self) {
        self.attrs.dispose();
    }
}
