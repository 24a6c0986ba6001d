//! Multi-section document assembly
//!
//! Combines several independently generated record sequences into a single
//! document. Every section is rendered on its own: a section that fails to
//! render contributes only an error paragraph, and the remaining sections
//! are still assembled. Sections are separated by page breaks; there is no
//! page break after the last section.
//!
//! # Example
//!
//! ```
//! use lexdraft_ooxml::{AssemblyOptions, DocumentAssembly};
//! use lexdraft_records::{ParagraphRecord, RunRecord};
//!
//! let mut assembly = DocumentAssembly::new(AssemblyOptions::default());
//! assembly.push_records(
//!     Some("CACI 100: Preliminary Admonitions".to_string()),
//!     vec![ParagraphRecord::new("Normal").with_run(RunRecord::new("You have now been sworn."))],
//! );
//! assembly.push_failure(Some("CACI 200".to_string()), "generation timed out");
//!
//! let output = assembly.build(None)?;
//! assert_eq!(output.failures.len(), 1);
//! # Ok::<(), lexdraft_ooxml::OoxmlError>(())
//! ```

use tracing::{debug, warn};

use lexdraft_records::{ParagraphRecord, Rgb};

use crate::error::Result;
use crate::template::Template;
use crate::writer::{finish_document, DocxWriter, ReconstructOptions};

const PAGE_BREAK: &str = r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#;

/// Options controlling assembly
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyOptions {
    /// Font size of section titles, in points
    pub title_size_pt: u32,
    /// Color of substituted error paragraphs
    pub error_color: Rgb,
    /// Insert a page break between sections
    pub page_breaks: bool,
    /// Options for rendering each section's records
    pub reconstruct: ReconstructOptions,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            title_size_pt: 14,
            error_color: Rgb::RED,
            page_breaks: true,
            reconstruct: ReconstructOptions::default(),
        }
    }
}

/// Content of one section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    /// Records to render
    Records(Vec<ParagraphRecord>),
    /// The section could not be produced upstream
    Failed(String),
}

/// One section of an assembled document
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Bold title line rendered before the records
    pub title: Option<String>,
    /// Section content
    pub content: SectionContent,
}

/// A section that ended up as an error paragraph
#[derive(Debug, Clone, PartialEq)]
pub struct SectionFailure {
    /// Zero-based section index
    pub index: usize,
    /// Section title, if any
    pub title: Option<String>,
    /// The error message shown in the document
    pub message: String,
}

/// Result of [`DocumentAssembly::build`]
#[derive(Debug, Clone)]
pub struct AssemblyOutput {
    /// The DOCX package
    pub document: Vec<u8>,
    /// Sections replaced by an error paragraph
    pub failures: Vec<SectionFailure>,
}

/// Builder for a document made of independent sections
#[derive(Debug, Clone, Default)]
pub struct DocumentAssembly {
    sections: Vec<Section>,
    options: AssemblyOptions,
}

impl DocumentAssembly {
    /// Create an empty assembly
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            sections: Vec::new(),
            options,
        }
    }

    /// Add a section with records to render
    pub fn push_records(&mut self, title: Option<String>, records: Vec<ParagraphRecord>) {
        self.sections.push(Section {
            title,
            content: SectionContent::Records(records),
        });
    }

    /// Add a section that already failed upstream
    pub fn push_failure(&mut self, title: Option<String>, message: impl Into<String>) {
        self.sections.push(Section {
            title,
            content: SectionContent::Failed(message.into()),
        });
    }

    /// Sections added so far
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections were added
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render all sections into one DOCX
    ///
    /// Only problems with the base package itself fail the build; section
    /// failures are reported in [`AssemblyOutput::failures`].
    pub fn build(&self, base: Option<Template>) -> Result<AssemblyOutput> {
        let mut template = base.unwrap_or_else(Template::blank);
        let styles = template.get_styles()?.clone();
        let mut writer = DocxWriter::new(styles, self.options.reconstruct.clone());

        let mut body = String::new();
        let mut failures = Vec::new();
        let last = self.sections.len().saturating_sub(1);

        for (index, section) in self.sections.iter().enumerate() {
            let rendered = match &section.content {
                SectionContent::Records(records) => writer
                    .render_records(records)
                    .map_err(|e| e.to_string()),
                SectionContent::Failed(message) => Err(message.clone()),
            };

            match rendered {
                Ok(content) => {
                    if let Some(title) = &section.title {
                        body.push_str(&writer.render_title(title, self.options.title_size_pt * 2));
                    }
                    body.push_str(&content);
                    debug!(section = index, "rendered section");
                }
                Err(message) => {
                    let label = section
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("section {}", index + 1));
                    warn!(section = index, error = %message, "section replaced by error paragraph");
                    body.push_str(&writer.render_error(
                        &format!("Error processing {}: {}", label, message),
                        self.options.error_color,
                    ));
                    failures.push(SectionFailure {
                        index,
                        title: section.title.clone(),
                        message,
                    });
                }
            }

            if self.options.page_breaks && index < last {
                body.push_str(PAGE_BREAK);
            }
        }

        Ok(AssemblyOutput {
            document: finish_document(template, &body)?,
            failures,
        })
    }
}
