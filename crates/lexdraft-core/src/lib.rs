//! lexdraft-core - Legal drafts from generated text
//!
//! This crate turns free text from a text-generation service into paragraph
//! records and drives the form-filling pipeline:
//!
//! - [`recovery`]: tolerant recovery of record arrays from generated text
//! - [`generator`]: the injected [`TextGenerator`] seam
//! - [`pipeline`]: summarize, list forms, fill each form, assemble
//! - [`config`]: `lexdraft.toml` settings
//!
//! # Example
//!
//! ```
//! use lexdraft_core::recover;
//! use lexdraft_ooxml::DocxWriter;
//!
//! let generated = "```json\n{\"style\": \"normal\", \"runs\": [{\"text\": \"Members of the jury,\"}]}\n```";
//! let records = recover(generated)?;
//! let docx = DocxWriter::build(&records, None)?;
//! assert!(!docx.is_empty());
//! # Ok::<(), lexdraft_core::CoreError>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod pipeline;
pub mod prompts;
pub mod recovery;

pub use config::Settings;
pub use error::{CoreError, Result};
pub use generator::{TextGenerator, MIME_PDF, MIME_TEXT};
pub use pipeline::{FormPipeline, PipelineOutput, SourceDocument};
pub use recovery::{recover, recover_array, recover_forms, FormRequest};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
