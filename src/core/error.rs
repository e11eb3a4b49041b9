//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Level name not present in the level name table
    #[error("unknown level \"{0}\"")]
    UnknownLevel(String),

    /// Output format name not present in the format name table
    #[error("unknown output format \"{0}\"")]
    UnknownFormat(String),

    /// The same field name was written twice into one JSON record
    #[error("key exists: \"{0}\"")]
    KeyExists(String),

    /// An `Any` value could not be structurally encoded
    #[error("failed to encode \"{key}\": {message}")]
    Encode { key: String, message: String },

    /// Requested stack depth exceeds the stack
    #[error("no frames")]
    NoFrames,

    /// `{{` found while a placeholder is already open
    #[error("indirect open key at {offset}")]
    IndirectOpenKey { offset: usize },

    /// `}}` found outside of a placeholder
    #[error("indirect close key at {offset}")]
    IndirectCloseKey { offset: usize },

    /// Placeholder without a key name
    #[error("empty key at {offset}")]
    EmptyKey { offset: usize },

    /// Input ended inside a placeholder
    #[error("unclosed key at {offset}")]
    UnclosedKey { offset: usize },

    /// Write attempted after the writer was closed
    #[error("writer closed")]
    WriterClosed,

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Several failures collected along one write pipeline
    #[error("{}", join_messages(.0))]
    Joined(Vec<LoggerError>),
}

fn join_messages(errors: &[LoggerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an encoding error for the attribute stored under `key`
    pub fn encode(key: impl Into<String>, message: impl ToString) -> Self {
        LoggerError::Encode {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Join collected errors; a single error is returned as is
    pub fn joined(mut errors: Vec<LoggerError>) -> Self {
        if errors.len() == 1 {
            if let Some(err) = errors.pop() {
                return err;
            }
        }
        LoggerError::Joined(errors)
    }

    /// Byte offset of a malformed template construct, if this is one
    pub fn offset(&self) -> Option<usize> {
        match self {
            LoggerError::IndirectOpenKey { offset }
            | LoggerError::IndirectCloseKey { offset }
            | LoggerError::EmptyKey { offset }
            | LoggerError::UnclosedKey { offset } => Some(*offset),
            _ => None,
        }
    }
}
