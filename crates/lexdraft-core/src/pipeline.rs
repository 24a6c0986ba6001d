//! Form-filling pipeline
//!
//! Drives the generator through a filing:
//!
//! 1. summarize the case document;
//! 2. ask which forms the filing requires and recover that list;
//! 3. for each form, send the template blueprint with fill instructions
//!    and recover paragraph records from the answer;
//! 4. assemble all forms into one document.
//!
//! Steps 1 and 2 are fatal. A form whose generation, recovery or
//! reconstruction fails becomes an error paragraph in the output and the
//! remaining forms are still processed.

use tracing::{info, warn};

use lexdraft_ooxml::{DocumentAssembly, SectionFailure, Template};
use lexdraft_records::ParagraphRecord;

use crate::config::Settings;
use crate::error::Result;
use crate::generator::{TextGenerator, MIME_PDF, MIME_TEXT};
use crate::prompts;
use crate::recovery::{self, FormRequest};

/// A document handed to the generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Raw document bytes
    pub bytes: Vec<u8>,
    /// Declared media type
    pub mime_type: String,
}

impl SourceDocument {
    /// A document with an explicit media type
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// A PDF document
    pub fn pdf(bytes: Vec<u8>) -> Self {
        Self::new(bytes, MIME_PDF)
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The assembled DOCX
    pub document: Vec<u8>,
    /// Forms processed, in output order
    pub forms: Vec<FormRequest>,
    /// Forms replaced by an error paragraph
    pub failures: Vec<SectionFailure>,
}

/// Pipeline filling a template once per required form
pub struct FormPipeline<G> {
    generator: G,
    blueprint: String,
    settings: Settings,
}

impl<G: TextGenerator> FormPipeline<G> {
    /// Create a pipeline from a generator and the template's records
    pub fn new(generator: G, blueprint: &[ParagraphRecord]) -> Result<Self> {
        Ok(Self::from_blueprint_text(
            generator,
            lexdraft_records::to_json_lines(blueprint)?,
        ))
    }

    /// Create a pipeline from an already persisted line-delimited blueprint
    pub fn from_blueprint_text(generator: G, blueprint: impl Into<String>) -> Self {
        Self {
            generator,
            blueprint: blueprint.into(),
            settings: Settings::default(),
        }
    }

    /// Use the given settings
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// The injected generator
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Ask the generator for a summary of the case
    pub fn case_summary(&self, case: &SourceDocument) -> Result<String> {
        let prompt = self
            .settings
            .generation
            .case_summary_prompt
            .as_deref()
            .unwrap_or(prompts::CASE_SUMMARY_PROMPT);
        self.generator.generate(&case.bytes, &case.mime_type, prompt)
    }

    /// Ask the generator which forms the filing requires
    pub fn required_forms(&self, filing: &SourceDocument) -> Result<Vec<FormRequest>> {
        let prompt = self
            .settings
            .generation
            .form_list_prompt
            .as_deref()
            .unwrap_or(prompts::FORM_LIST_PROMPT);
        let answer = self
            .generator
            .generate(&filing.bytes, &filing.mime_type, prompt)?;
        recovery::recover_forms(&answer)
    }

    /// Fill the blueprint for one form
    pub fn fill_form(&self, form: &FormRequest, case_summary: &str) -> Result<Vec<ParagraphRecord>> {
        let prompt = prompts::fill_prompt(form, case_summary);
        let answer = self
            .generator
            .generate(self.blueprint.as_bytes(), MIME_TEXT, &prompt)?;
        recovery::recover(&answer)
    }

    /// Run the whole pipeline
    ///
    /// `case` is summarized for context; `filing` determines the forms.
    pub fn run(
        &self,
        case: &SourceDocument,
        filing: &SourceDocument,
        base: Option<Template>,
    ) -> Result<PipelineOutput> {
        let summary = self.case_summary(case)?;
        info!(chars = summary.len(), "received case summary");

        let forms = self.required_forms(filing)?;
        info!(forms = forms.len(), "identified required forms");

        let mut assembly = DocumentAssembly::new(self.settings.assembly_options());
        for (i, form) in forms.iter().enumerate() {
            info!(
                "Processing {}/{}: CACI {} - {}",
                i + 1,
                forms.len(),
                form.number,
                form.title
            );
            match self.fill_form(form, &summary) {
                Ok(records) => assembly.push_records(Some(form.heading()), records),
                Err(e) => {
                    warn!(form = %form.number, error = %e, "form generation failed");
                    assembly.push_failure(Some(form.heading()), e.to_string());
                }
            }
        }

        let output = assembly.build(base)?;
        info!(
            forms = forms.len(),
            failed = output.failures.len(),
            "assembled document"
        );

        Ok(PipelineOutput {
            document: output.document,
            forms,
            failures: output.failures,
        })
    }
}
