//! Error types for record encoding and decoding

use thiserror::Error;

/// Errors that can occur while reading or writing records
#[derive(Error, Debug)]
pub enum RecordError {
    /// A line of a line-delimited record artifact could not be decoded
    #[error("Invalid record on line {line}: {source}")]
    InvalidLine {
        /// 1-based line number
        line: usize,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded
    #[error("Record encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Error reading or writing the artifact
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for record operations
pub type Result<T> = std::result::Result<T, RecordError>;
