//! Document reconstructor
//!
//! Renders [`ParagraphRecord`]s into word/document.xml on top of a base
//! template. The base supplies styles, fonts, numbering and page setup; its
//! body content is discarded.
//!
//! Rendering is all-or-nothing: the first record that cannot be rendered
//! (unknown style, missing `runs`, missing run text) aborts the build and no
//! document is produced.

use tracing::{debug, warn};

use lexdraft_records::{ParagraphRecord, Rgb, RunRecord};

use crate::archive::DOCUMENT_XML;
use crate::document::BodyShell;
use crate::error::{OoxmlError, Result};
use crate::styles::StyleSheet;
use crate::template::Template;

/// Options controlling reconstruction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructOptions {
    /// Style used for records whose style the target does not define.
    /// `None` makes an unknown style a [`OoxmlError::StyleNotFound`] error.
    pub fallback_style: Option<String>,
}

impl ReconstructOptions {
    /// Use `style` for records naming an unknown style
    pub fn with_fallback_style(mut self, style: impl Into<String>) -> Self {
        self.fallback_style = Some(style.into());
        self
    }
}

/// Writer producing document.xml body content from records
pub struct DocxWriter {
    /// XML output buffer
    output: String,
    /// Styles of the target document
    styles: StyleSheet,
    /// Reconstruction options
    options: ReconstructOptions,
}

impl DocxWriter {
    /// Create a writer targeting the given styles
    pub fn new(styles: StyleSheet, options: ReconstructOptions) -> Self {
        Self {
            output: String::new(),
            styles,
            options,
        }
    }

    /// Build a DOCX from records
    ///
    /// With `base`, the result keeps every part of the base package but its
    /// body content; without it, the built-in blank document is used.
    pub fn build(records: &[ParagraphRecord], base: Option<Template>) -> Result<Vec<u8>> {
        Self::build_with_options(records, base, &ReconstructOptions::default())
    }

    /// Build a DOCX from records with options
    pub fn build_with_options(
        records: &[ParagraphRecord],
        base: Option<Template>,
        options: &ReconstructOptions,
    ) -> Result<Vec<u8>> {
        let mut template = base.unwrap_or_else(Template::blank);
        let styles = template.get_styles()?.clone();

        let mut writer = DocxWriter::new(styles, options.clone());
        let body = writer.render_records(records)?;

        debug!(paragraphs = records.len(), "reconstructed document");
        finish_document(template, &body)
    }

    /// Render records to body XML
    ///
    /// Returns the fragment only when every record rendered; the writer's
    /// buffer is cleared either way.
    pub fn render_records(&mut self, records: &[ParagraphRecord]) -> Result<String> {
        self.output.clear();
        let result = records
            .iter()
            .enumerate()
            .try_for_each(|(index, record)| self.generate_paragraph(index, record));
        let body = std::mem::take(&mut self.output);
        result.map(|()| body)
    }

    /// Render a bold title line in the default paragraph style
    pub(crate) fn render_title(&mut self, title: &str, half_points: u32) -> String {
        self.output.clear();
        self.output.push_str("<w:p>");
        self.output.push_str("<w:r><w:rPr><w:b/>");
        self.output.push_str(&format!(
            "<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>",
            half_points
        ));
        self.output.push_str("</w:rPr>");
        self.generate_text(title);
        self.output.push_str("</w:r></w:p>");
        std::mem::take(&mut self.output)
    }

    /// Render a plain paragraph in a signalling color
    pub(crate) fn render_error(&mut self, message: &str, color: Rgb) -> String {
        self.output.clear();
        self.output.push_str("<w:p><w:r><w:rPr>");
        self.output
            .push_str(&format!("<w:color w:val=\"{}\"/>", color.to_hex()));
        self.output.push_str("</w:rPr>");
        self.generate_text(message);
        self.output.push_str("</w:r></w:p>");
        std::mem::take(&mut self.output)
    }

    /// Resolve a record's style name to a style ID of the target
    fn resolve_style_id(&self, name: &str) -> Result<String> {
        if let Some(style) = self.styles.find_paragraph_style(name) {
            return Ok(style.id.clone());
        }

        match self.options.fallback_style.as_deref() {
            Some(fallback) => match self.styles.find_paragraph_style(fallback) {
                Some(style) => {
                    warn!(style = name, fallback, "unknown paragraph style, using fallback");
                    Ok(style.id.clone())
                }
                None => Err(OoxmlError::StyleNotFound(name.to_string())),
            },
            None => Err(OoxmlError::StyleNotFound(name.to_string())),
        }
    }

    /// Generate XML for one record
    fn generate_paragraph(&mut self, index: usize, record: &ParagraphRecord) -> Result<()> {
        let runs = record.runs.as_deref().ok_or_else(|| OoxmlError::MissingField {
            index,
            field: "runs".to_string(),
        })?;
        let style_id = self.resolve_style_id(&record.style)?;

        self.output.push_str("<w:p>");
        self.output.push_str(&format!(
            "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
            escape_xml(&style_id)
        ));

        for (run_index, run) in runs.iter().enumerate() {
            self.generate_run(index, run_index, run)?;
        }

        self.output.push_str("</w:p>");
        Ok(())
    }

    /// Generate XML for one run
    fn generate_run(&mut self, index: usize, run_index: usize, run: &RunRecord) -> Result<()> {
        let text = run.text.as_deref().ok_or_else(|| OoxmlError::MissingField {
            index,
            field: format!("runs[{}].text", run_index),
        })?;
        if let Some(c) = text.chars().find(|c| is_forbidden_char(*c)) {
            return Err(OoxmlError::InvalidStructure(format!(
                "record {} run {} contains character U+{:04X}, which XML cannot represent",
                index, run_index, c as u32
            )));
        }

        let color = run.explicit_color();
        if color.is_none() && run.color.as_ref().is_some_and(|c| !c.is_auto()) {
            warn!(record = index, run = run_index, color = ?run.color, "ignoring malformed run color");
        }

        self.output.push_str("<w:r>");

        let mut properties = String::new();
        if let Some(bold) = run.bold {
            properties.push_str(toggle("b", bold));
        }
        if let Some(italic) = run.italic {
            properties.push_str(toggle("i", italic));
        }
        if let Some(color) = color {
            properties.push_str(&format!("<w:color w:val=\"{}\"/>", color.to_hex()));
        }
        if !properties.is_empty() {
            self.output.push_str("<w:rPr>");
            self.output.push_str(&properties);
            self.output.push_str("</w:rPr>");
        }

        self.generate_text(text);
        self.output.push_str("</w:r>");
        Ok(())
    }

    /// Generate run content: `\n` becomes `w:br`, `\t` becomes `w:tab`
    fn generate_text(&mut self, text: &str) {
        let mut segment = String::new();
        for c in text.chars() {
            match c {
                '\n' | '\t' => {
                    self.flush_text(&segment);
                    segment.clear();
                    self.output
                        .push_str(if c == '\n' { "<w:br/>" } else { "<w:tab/>" });
                }
                _ => segment.push(c),
            }
        }
        self.flush_text(&segment);
    }

    fn flush_text(&mut self, segment: &str) {
        if !segment.is_empty() {
            self.output.push_str(&format!(
                "<w:t xml:space=\"preserve\">{}</w:t>",
                escape_xml(segment)
            ));
        }
    }
}

/// Replace the body of the template's document.xml and package the result
pub(crate) fn finish_document(template: Template, body: &str) -> Result<Vec<u8>> {
    let mut archive = template.into_archive();
    let shell = BodyShell::extract(archive.document_xml()?)?;

    let mut xml = String::with_capacity(body.len() + shell.root_start.len() + 256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&shell.root_start);
    xml.push_str(&format!("<{}>", shell.body_name));
    xml.push_str(body);
    if let Some(section) = &shell.section_properties {
        xml.push_str(section);
    }
    xml.push_str(&format!("</{}></{}>", shell.body_name, shell.root_name));

    archive.set_string(DOCUMENT_XML, xml);
    archive.to_bytes()
}

fn toggle(tag: &str, on: bool) -> &'static str {
    match (tag, on) {
        ("b", true) => "<w:b/>",
        ("b", false) => "<w:b w:val=\"0\"/>",
        (_, true) => "<w:i/>",
        (_, false) => "<w:i w:val=\"0\"/>",
    }
}

/// Control characters other than tab, newline and carriage return
fn is_forbidden_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::test_utils::{create_template_with_styles, extract_document_xml};
    use lexdraft_records::ColorValue;

    fn normal(runs: Vec<RunRecord>) -> ParagraphRecord {
        runs.into_iter()
            .fold(ParagraphRecord::new("Normal"), ParagraphRecord::with_run)
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_build_without_base() {
        let records = vec![
            ParagraphRecord::new("Heading 1").with_run(RunRecord::new("CACI 3900")),
            normal(vec![RunRecord::new("Damages")]),
        ];
        let docx = DocxWriter::build(&records, None).unwrap();
        let xml = extract_document_xml(&docx);

        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Normal"/>"#));
        assert!(xml.contains("<w:sectPr>"));

        let doc = Document::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.plain_text(), "CACI 3900\nDamages");
    }

    #[test]
    fn test_run_formatting_tri_state() {
        let records = vec![normal(vec![
            RunRecord::new("a").bold(true),
            RunRecord::new("b").bold(false).italic(true),
            RunRecord::new("c"),
        ])];
        let xml = extract_document_xml(&DocxWriter::build(&records, None).unwrap());

        assert!(xml.contains(r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">a</w:t></w:r>"#));
        assert!(xml.contains(r#"<w:rPr><w:b w:val="0"/><w:i/></w:rPr>"#));
        assert!(xml.contains(r#"<w:r><w:t xml:space="preserve">c</w:t></w:r>"#));
    }

    #[test]
    fn test_colors() {
        let records = vec![normal(vec![
            RunRecord::new("red").with_color(Rgb::RED),
            RunRecord {
                color: Some(ColorValue::Text("#00ff7f".to_string())),
                ..RunRecord::new("hex")
            },
            RunRecord {
                color: Some(ColorValue::Text("auto".to_string())),
                ..RunRecord::new("auto")
            },
            RunRecord {
                color: Some(ColorValue::Text("nope".to_string())),
                ..RunRecord::new("bad")
            },
        ])];
        let xml = extract_document_xml(&DocxWriter::build(&records, None).unwrap());

        assert!(xml.contains(r#"<w:color w:val="FF0000"/>"#));
        assert!(xml.contains(r#"<w:color w:val="00FF7F"/>"#));
        assert_eq!(xml.matches("<w:color").count(), 2);
    }

    #[test]
    fn test_text_is_literal() {
        let records = vec![normal(vec![RunRecord::new("  A & B <c>\tx\ny  ")])];
        let xml = extract_document_xml(&DocxWriter::build(&records, None).unwrap());
        assert!(xml.contains(r#"<w:t xml:space="preserve">  A &amp; B &lt;c&gt;</w:t><w:tab/>"#));

        let doc = Document::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.paragraphs[0].runs[0].text, "  A & B <c>\tx\ny  ");
    }

    #[test]
    fn test_style_not_found() {
        let records = vec![
            normal(vec![RunRecord::new("ok")]),
            ParagraphRecord::new("Jury Verdict").with_run(RunRecord::new("x")),
        ];
        let err = DocxWriter::build(&records, None).unwrap_err();
        assert!(matches!(err, OoxmlError::StyleNotFound(ref s) if s == "Jury Verdict"));
    }

    #[test]
    fn test_fallback_style() {
        let records = vec![ParagraphRecord::new("Jury Verdict").with_run(RunRecord::new("x"))];
        let options = ReconstructOptions::default().with_fallback_style("Normal");
        let xml =
            extract_document_xml(&DocxWriter::build_with_options(&records, None, &options).unwrap());
        assert!(xml.contains(r#"<w:pStyle w:val="Normal"/>"#));

        let options = ReconstructOptions::default().with_fallback_style("Nonexistent");
        assert!(DocxWriter::build_with_options(&records, None, &options).is_err());
    }

    #[test]
    fn test_style_matching_is_lenient_on_case_and_id() {
        let records = vec![
            ParagraphRecord::new("Heading1").with_run(RunRecord::new("by id")),
            ParagraphRecord::new("List paragraph").with_run(RunRecord::new("by case")),
        ];
        let xml = extract_document_xml(&DocxWriter::build(&records, None).unwrap());
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="ListParagraph"/>"#));
    }

    #[test]
    fn test_missing_runs_names_record_index() {
        let mut missing = ParagraphRecord::new("Normal");
        missing.runs = None;
        let records = vec![normal(vec![]), missing];
        let err = DocxWriter::build(&records, None).unwrap_err();
        assert!(matches!(
            err,
            OoxmlError::MissingField { index: 1, ref field } if field == "runs"
        ));
    }

    #[test]
    fn test_missing_run_text() {
        let records = vec![normal(vec![RunRecord::default()])];
        let err = DocxWriter::build(&records, None).unwrap_err();
        assert!(matches!(
            err,
            OoxmlError::MissingField { index: 0, ref field } if field == "runs[0].text"
        ));
    }

    #[test]
    fn test_control_characters_are_rejected() {
        let records = vec![normal(vec![RunRecord::new("bell\u{7}")])];
        assert!(matches!(
            DocxWriter::build(&records, None),
            Err(OoxmlError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_render_records_is_all_or_nothing() {
        let mut writer = DocxWriter::new(
            Template::blank().get_styles().unwrap().clone(),
            ReconstructOptions::default(),
        );
        let records = vec![
            normal(vec![RunRecord::new("kept?")]),
            ParagraphRecord::new("Missing Style"),
        ];
        assert!(writer.render_records(&records).is_err());
        // buffer is reset after a failure
        let body = writer.render_records(&records[..1]).unwrap();
        assert_eq!(body.matches("<w:p>").count(), 1);
    }

    #[test]
    fn test_empty_records_and_runs() {
        let xml = extract_document_xml(&DocxWriter::build(&[], None).unwrap());
        assert!(Document::parse(xml.as_bytes()).unwrap().paragraphs.is_empty());

        let xml = extract_document_xml(&DocxWriter::build(&[normal(vec![])], None).unwrap());
        let doc = Document::parse(xml.as_bytes()).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
        assert!(doc.paragraphs[0].runs.is_empty());
    }

    #[test]
    fn test_base_document_content_is_replaced() {
        let base = Template::from_bytes(&create_template_with_styles()).unwrap();
        let records = vec![normal(vec![RunRecord::new("Fresh")])];
        let docx = DocxWriter::build(&records, Some(base)).unwrap();
        let xml = extract_document_xml(&docx);

        assert!(!xml.contains("Template with styles"));
        assert!(xml.contains("Fresh"));
        // page setup of the base survives
        assert!(xml.contains(r#"<w:pgSz w:w="11906" w:h="16838"/>"#));
        assert!(xml.contains("xmlns:r="));

        let archive = crate::archive::OoxmlArchive::from_bytes(&docx).unwrap();
        assert!(archive.get("word/styles.xml").is_some());
        assert!(archive.get("[Content_Types].xml").is_some());
    }
}
