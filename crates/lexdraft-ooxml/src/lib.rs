//! # lexdraft-ooxml
//!
//! DOCX handling for lexdraft.
//!
//! This crate provides functionality to:
//! - Read the paragraphs, runs and styles of DOCX/DOTX files
//! - Serialize a template into paragraph records and a line-delimited blueprint
//! - Rebuild a styled DOCX from paragraph records, optionally on a base document
//! - Assemble several independently generated sections into one document
//!
//! ## Example: Template to blueprint
//!
//! ```no_run
//! use lexdraft_ooxml::{serializer, Template};
//!
//! let mut template = Template::load("caci_template.docx")?;
//! let records = serializer::serialize_to_blueprint(&mut template, "template_blueprint.jsonl")?;
//! println!("{} paragraphs", records.len());
//! # Ok::<(), lexdraft_ooxml::OoxmlError>(())
//! ```
//!
//! ## Example: Records to document
//!
//! ```
//! use lexdraft_ooxml::DocxWriter;
//! use lexdraft_records::{ParagraphRecord, RunRecord};
//!
//! let records = vec![ParagraphRecord::new("Heading 1").with_run(RunRecord::new("CACI 3900"))];
//! let docx = DocxWriter::build(&records, None)?;
//! assert!(!docx.is_empty());
//! # Ok::<(), lexdraft_ooxml::OoxmlError>(())
//! ```

pub mod archive;
pub mod assembly;
pub mod document;
pub mod error;
pub mod serializer;
pub mod styles;
pub mod template;
pub mod writer;

#[cfg(test)]
mod test_utils;

pub use archive::OoxmlArchive;
pub use assembly::{
    AssemblyOptions, AssemblyOutput, DocumentAssembly, Section, SectionContent, SectionFailure,
};
pub use document::{BodyShell, Document, Paragraph, Run};
pub use error::{OoxmlError, Result};
pub use serializer::{serialize, serialize_file, serialize_to_blueprint, write_blueprint};
pub use styles::{Style, StyleSheet, StyleType};
pub use template::Template;
pub use writer::{DocxWriter, ReconstructOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
