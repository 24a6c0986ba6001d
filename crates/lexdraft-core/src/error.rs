//! Error types for lexdraft-core

use thiserror::Error;

use lexdraft_ooxml::OoxmlError;
use lexdraft_records::RecordError;

/// Errors from recovery, configuration and the form pipeline
#[derive(Error, Debug)]
pub enum CoreError {
    /// Generated text could not be decoded after all sanctioned repairs
    #[error("Malformed record output: {source}")]
    MalformedRecord {
        /// The decode error of the repaired text
        #[source]
        source: serde_json::Error,
        /// The repaired text that failed to decode
        fragment: String,
    },

    /// The text-generation service failed
    #[error("Text generation failed: {0}")]
    Generation(String),

    /// Document reading or reconstruction failed
    #[error(transparent)]
    Ooxml(#[from] OoxmlError),

    /// Blueprint encoding or decoding failed
    #[error(transparent)]
    Records(#[from] RecordError),

    /// Invalid configuration file
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// The text that failed to decode, for malformed record output
    pub fn fragment(&self) -> Option<&str> {
        match self {
            CoreError::MalformedRecord { fragment, .. } => Some(fragment),
            _ => None,
        }
    }
}

/// Result type for lexdraft-core operations
pub type Result<T> = std::result::Result<T, CoreError>;
