//! Log level definitions

use super::error::LoggerError;
use super::names::NameTable;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static LEVEL_NAMES: LazyLock<NameTable> = LazyLock::new(|| {
    NameTable::new(&[
        (Level::TRACE.0 as i64, "TRACE"),
        (Level::DEBUG.0 as i64, "DEBUG"),
        (Level::INFO.0 as i64, "INFO"),
        (Level::WARN.0 as i64, "WARN"),
        (Level::ERROR.0 as i64, "ERROR"),
        (Level::FATAL.0 as i64, "FATAL"),
    ])
});

/// Severity of a record.
///
/// Levels are plain integers compared numerically, so custom levels can be
/// placed between the named thresholds and given a name with
/// [`Level::set_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub i32);

impl Level {
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
    pub const FATAL: Level = Level(12);

    /// Register or override the display name of a level value.
    ///
    /// A name already held by another level moves to `level`.
    pub fn set_name(level: Level, name: &str) {
        LEVEL_NAMES.set(level.0 as i64, name);
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match *self {
            l if l >= Level::FATAL => BrightRed,
            l if l >= Level::ERROR => Red,
            l if l >= Level::WARN => Yellow,
            l if l >= Level::INFO => Green,
            l if l >= Level::DEBUG => Blue,
            _ => BrightBlack,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::DEBUG
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        LEVEL_NAMES.with_name(self.0 as i64, |name| match name {
            Some(name) => f.write_str(name),
            None => write!(f, "Level<{}>", self.0),
        })
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LEVEL_NAMES
            .lookup(s)
            .map(|value| Level(value as i32))
            .ok_or_else(|| LoggerError::UnknownLevel(s.to_string()))
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
