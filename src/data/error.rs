//! Error types for data operations
//!
//! Provides unified error handling for fetching, parsing and decoding funnel data.

use thiserror::Error;

/// Errors that can occur while loading or parsing funnel data
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parse error: {0}")]
    Csv(String),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Inline configuration could not be interpreted
    #[error("Inline config error: {0}")]
    InlineConfig(String),

    /// A callable reference names no registered formatter
    #[error("Unknown formatter: {0}")]
    UnknownFormatter(String),

    /// Fetching the source failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// File is empty
    #[error("Empty file")]
    EmptyFile,
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;

/// Errors raised by a [`DataFetcher`](super::DataFetcher)
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source answered with a non-success status
    #[error("Failed to load {path}: status {status}")]
    Status { path: String, status: u16 },

    /// The path escapes the data root or is otherwise unusable
    #[error("Invalid data path: {0}")]
    InvalidPath(String),

    /// Reading the source failed
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn not_found(path: impl Into<String>) -> Self {
        FetchError::Status {
            path: path.into(),
            status: 404,
        }
    }
}
