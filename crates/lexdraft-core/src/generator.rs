//! Text-generation seam
//!
//! The pipeline never talks to a model directly. Callers pass in a
//! [`TextGenerator`], so recovery and reconstruction stay pure functions of
//! their inputs and tests run without a network.

use crate::error::Result;

/// Media type of PDF case documents
pub const MIME_PDF: &str = "application/pdf";
/// Media type of the line-delimited blueprint
pub const MIME_TEXT: &str = "text/plain";

/// A service turning a document and an instruction into free text
///
/// Implementations report transport or service failures as
/// [`CoreError::Generation`](crate::CoreError::Generation). The returned
/// text is not trusted to follow any schema.
pub trait TextGenerator {
    /// Generate text from a document payload and an instruction
    fn generate(&self, document: &[u8], mime_type: &str, instructions: &str) -> Result<String>;
}

impl<F> TextGenerator for F
where
    F: Fn(&[u8], &str, &str) -> Result<String>,
{
    fn generate(&self, document: &[u8], mime_type: &str, instructions: &str) -> Result<String> {
        self(document, mime_type, instructions)
    }
}
