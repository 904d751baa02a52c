//! Error handling for aggregation runs.
//!
//! Provides error types with context for input failures, malformed
//! measurements, table exhaustion and internal invariant violations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    /// I/O operation on a collaborator (input, output) failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A temperature field did not match `-?d{1,2}.d`
    #[error("Malformed measurement at byte offset {offset}: {raw:?}")]
    Parse { offset: usize, raw: String },

    /// Every slot of a partition table is taken by another station
    #[error("Partition table is full: all {capacity} slots are occupied")]
    TableFull { capacity: usize },

    /// A registered station was not found in any partition table
    #[error("Station {key:?} is registered but absent from every partition table")]
    MissingKey { key: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Worker {worker} panicked while scanning its chunk")]
    WorkerPanicked { worker: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AggregatorError {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a parse error, capturing the raw bytes lossily for display
    pub fn parse(offset: usize, raw: &[u8]) -> Self {
        Self::Parse {
            offset,
            raw: String::from_utf8_lossy(raw).into_owned(),
        }
    }

    /// Rebase the offset of a parse error found inside a block starting at `base`
    pub fn with_base_offset(self, base: usize) -> Self {
        match self {
            Self::Parse { offset, raw } => Self::Parse {
                offset: offset + base,
                raw,
            },
            other => other,
        }
    }

    pub fn missing_key(key: &[u8]) -> Self {
        Self::MissingKey {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AggregatorError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
