//! Error types for OOXML operations

use thiserror::Error;

/// Errors that can occur during OOXML operations
#[derive(Error, Debug)]
pub enum OoxmlError {
    /// Error reading or writing the ZIP archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error reading or writing files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Required file not found in archive
    #[error("Required file not found: {0}")]
    MissingFile(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// A record names a paragraph style the target document does not define
    #[error("Style not found: {0}")]
    StyleNotFound(String),

    /// A record lacks a field required for reconstruction
    #[error("Record {index} is missing required field `{field}`")]
    MissingField {
        /// Zero-based index of the record in its sequence
        index: usize,
        /// Name of the missing field
        field: String,
    },

    /// Error reading or writing the line-delimited record artifact
    #[error("Record artifact error: {0}")]
    Records(#[from] lexdraft_records::RecordError),
}

/// Result type for OOXML operations
pub type Result<T> = std::result::Result<T, OoxmlError>;
