//! Template serializer
//!
//! Turns a Word document into [`ParagraphRecord`]s: one record per body
//! paragraph with the style's display name, every run's text, bold and
//! italic settings and explicit color, and the runs that look like unfilled
//! placeholders (text containing `#`, colored pure red).
//!
//! The records are also persisted as a line-delimited blueprint that is
//! later handed to the text generator as a worked example.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use lexdraft_records::{ParagraphRecord, RunRecord};

use crate::document::{Document, Paragraph, Run};
use crate::error::Result;
use crate::styles::StyleSheet;
use crate::template::Template;

/// Serialize every body paragraph of a template, in document order
pub fn serialize(template: &mut Template) -> Result<Vec<ParagraphRecord>> {
    let document = template.document()?;
    let styles = template.get_styles()?;
    let records = serialize_document(&document, styles);

    debug!(
        paragraphs = records.len(),
        placeholders = records.iter().map(|r| r.placeholders.len()).sum::<usize>(),
        "serialized template"
    );

    Ok(records)
}

/// Serialize a DOCX file
pub fn serialize_file<P: AsRef<Path>>(path: P) -> Result<Vec<ParagraphRecord>> {
    let mut template = Template::load(path)?;
    serialize(&mut template)
}

/// Serialize a template and persist the records as a line-delimited blueprint
///
/// Nothing is written when serialization fails.
pub fn serialize_to_blueprint<P: AsRef<Path>>(
    template: &mut Template,
    blueprint: P,
) -> Result<Vec<ParagraphRecord>> {
    let records = serialize(template)?;
    write_blueprint(blueprint, &records)?;
    Ok(records)
}

/// Persist records as a line-delimited blueprint file
pub fn write_blueprint<P: AsRef<Path>>(path: P, records: &[ParagraphRecord]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    lexdraft_records::write_json_lines(BufWriter::new(file), records)?;
    debug!(path = %path.display(), records = records.len(), "wrote blueprint");
    Ok(())
}

/// Convert parsed paragraphs to records, resolving style names
pub fn serialize_document(document: &Document, styles: &StyleSheet) -> Vec<ParagraphRecord> {
    document
        .paragraphs
        .iter()
        .map(|p| paragraph_record(p, styles))
        .collect()
}

fn paragraph_record(paragraph: &Paragraph, styles: &StyleSheet) -> ParagraphRecord {
    let style = styles.paragraph_style_name(paragraph.style_id.as_deref());
    paragraph
        .runs
        .iter()
        .map(run_record)
        .fold(ParagraphRecord::new(style), ParagraphRecord::with_run)
}

fn run_record(run: &Run) -> RunRecord {
    RunRecord {
        text: Some(run.text.clone()),
        bold: run.bold,
        italic: run.italic,
        color: run.color.map(Into::into),
    }
}
