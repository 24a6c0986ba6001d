//! Document content parsing (word/document.xml)
//!
//! This module reads the body-level paragraphs of a document together with
//! the formatting the template serializer needs: paragraph style ID and, per
//! run, text, bold/italic settings and explicit color.
//!
//! Only paragraphs that are direct children of `w:body` are collected, which
//! excludes table cells and text boxes. Runs are taken from the paragraph
//! itself and from hyperlinks inside it, in document order.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use lexdraft_records::Rgb;

use crate::error::{OoxmlError, Result};

/// A parsed Word document body
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Body-level paragraphs in document order
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph with its runs and style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    /// Style ID (references styles.xml); `None` means the default style
    pub style_id: Option<String>,
    /// Runs in document order
    pub runs: Vec<Run>,
}

/// A text run with formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// The text content; `w:tab` reads as `\t`, `w:br` and `w:cr` as `\n`
    pub text: String,
    /// Explicit bold setting, `None` when the run does not set it
    pub bold: Option<bool>,
    /// Explicit italic setting, `None` when the run does not set it
    pub italic: Option<bool>,
    /// Explicit RGB color, `None` when unset or `auto`
    pub color: Option<Rgb>,
}

impl Document {
    /// Parse a document from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        // Don't trim text - preserve whitespace in runs
        reader.config_mut().trim_text(false);

        let mut parser = BodyParser::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => parser.start(e),
                Ok(Event::Empty(ref e)) => {
                    parser.start(e);
                    parser.end();
                }
                Ok(Event::End(_)) => parser.end(),
                Ok(Event::Text(ref e)) => {
                    if parser.in_text {
                        let text = e.unescape().map_err(OoxmlError::Xml)?;
                        parser.push_text(&text);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if parser.in_text {
                        parser.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(Document {
            paragraphs: parser.paragraphs,
        })
    }

    /// Get plain text content, one line per paragraph
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Paragraph {
    /// Get plain text of this paragraph
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

struct OpenParagraph {
    depth: usize,
    paragraph: Paragraph,
}

struct OpenRun {
    depth: usize,
    run: Run,
}

/// Element-stack driven collector for body paragraphs
#[derive(Default)]
struct BodyParser {
    stack: Vec<Vec<u8>>,
    paragraphs: Vec<Paragraph>,
    para: Option<OpenParagraph>,
    run: Option<OpenRun>,
    in_text: bool,
}

impl BodyParser {
    fn parent(&self) -> Option<&[u8]> {
        self.stack.last().map(|n| n.as_slice())
    }

    /// Depth of the element being opened, relative to the open run
    fn run_offset(&self, depth: usize) -> Option<usize> {
        self.run
            .as_ref()
            .and_then(|r| depth.checked_sub(r.depth))
    }

    fn start(&mut self, e: &BytesStart) {
        let name = e.local_name().as_ref().to_vec();
        let depth = self.stack.len() + 1;
        let parent = self.parent();

        match name.as_slice() {
            b"p" if parent == Some(b"body") => {
                self.para = Some(OpenParagraph {
                    depth,
                    paragraph: Paragraph::default(),
                });
            }
            b"pStyle" if parent == Some(b"pPr") => {
                if let Some(open) = self.para.as_mut() {
                    if depth == open.depth + 2 {
                        open.paragraph.style_id = get_attr(e, b"w:val");
                    }
                }
            }
            b"r" => {
                if let Some(open) = self.para.as_ref() {
                    let direct = depth == open.depth + 1;
                    let in_link = depth == open.depth + 2 && parent == Some(b"hyperlink");
                    if direct || in_link {
                        self.run = Some(OpenRun {
                            depth,
                            run: Run::default(),
                        });
                    }
                }
            }
            b"b" | b"i" | b"color"
                if parent == Some(b"rPr") && self.run_offset(depth) == Some(2) =>
            {
                if let Some(open) = self.run.as_mut() {
                    match name.as_slice() {
                        b"b" => open.run.bold = Some(toggle_value(e)),
                        b"i" => open.run.italic = Some(toggle_value(e)),
                        _ => {
                            open.run.color = get_attr(e, b"w:val").and_then(|v| Rgb::from_hex(&v));
                        }
                    }
                }
            }
            b"t" if self.run_offset(depth) == Some(1) => self.in_text = true,
            b"tab" if self.run_offset(depth) == Some(1) => self.push_text("\t"),
            b"cr" if self.run_offset(depth) == Some(1) => self.push_text("\n"),
            b"br" if self.run_offset(depth) == Some(1) => {
                let kind = get_attr(e, b"w:type");
                if matches!(kind.as_deref(), None | Some("textWrapping")) {
                    self.push_text("\n");
                }
            }
            _ => {}
        }

        self.stack.push(name);
    }

    fn end(&mut self) {
        let depth = self.stack.len();
        let Some(name) = self.stack.pop() else {
            return;
        };

        match name.as_slice() {
            b"t" => self.in_text = false,
            b"r" if self.run.as_ref().is_some_and(|r| r.depth == depth) => {
                if let (Some(open_run), Some(open_para)) = (self.run.take(), self.para.as_mut()) {
                    open_para.paragraph.runs.push(open_run.run);
                }
            }
            b"p" if self.para.as_ref().is_some_and(|p| p.depth == depth) => {
                if let Some(open) = self.para.take() {
                    self.paragraphs.push(open.paragraph);
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(open) = self.run.as_mut() {
            open.run.text.push_str(text);
        }
    }
}

/// The parts of a document body that survive when its content is replaced
///
/// Holds the root start tag verbatim (all namespace declarations) and the
/// body-level section properties (page size, margins, header and footer
/// references).
#[derive(Debug, Clone, PartialEq)]
pub struct BodyShell {
    /// Raw `<w:document ...>` start tag
    pub root_start: String,
    /// Qualified name of the root element
    pub root_name: String,
    /// Qualified name of the body element
    pub body_name: String,
    /// Raw body-level `w:sectPr` element, if present
    pub section_properties: Option<String>,
}

impl BodyShell {
    /// Extract the shell of an existing document.xml
    pub fn extract(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut root: Option<(String, String)> = None;
        let mut body_name: Option<String> = None;
        let mut sect_start: Option<usize> = None;
        let mut section_properties = None;

        loop {
            let before = reader.buffer_position() as usize;
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    depth += 1;
                    let after = reader.buffer_position() as usize;
                    match depth {
                        1 => root = Some((slice(xml, before, after), qualified_name(e))),
                        2 if e.local_name().as_ref() == b"body" => {
                            body_name = Some(qualified_name(e));
                        }
                        3 if e.local_name().as_ref() == b"sectPr" && body_name.is_some() => {
                            sect_start = Some(before);
                        }
                        _ => {}
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    let after = reader.buffer_position() as usize;
                    if depth == 2 && body_name.is_some() && e.local_name().as_ref() == b"sectPr" {
                        section_properties = Some(slice(xml, before, after));
                    }
                }
                Ok(Event::End(ref e)) => {
                    if depth == 3 && e.local_name().as_ref() == b"sectPr" {
                        if let Some(start) = sect_start.take() {
                            let after = reader.buffer_position() as usize;
                            section_properties = Some(slice(xml, start, after));
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        let (root_start, root_name) = root.ok_or_else(|| {
            OoxmlError::InvalidStructure("document.xml has no root element".to_string())
        })?;
        let body_name = body_name.ok_or_else(|| {
            OoxmlError::InvalidStructure("document.xml has no body element".to_string())
        })?;

        Ok(Self {
            root_start,
            root_name,
            body_name,
            section_properties,
        })
    }
}

// Helper functions

fn slice(xml: &[u8], start: usize, end: usize) -> String {
    String::from_utf8_lossy(&xml[start.min(xml.len())..end.min(xml.len())]).into_owned()
}

fn qualified_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}

/// Value of an on/off property such as `<w:b/>` or `<w:i w:val="0"/>`
fn toggle_value(e: &BytesStart) -> bool {
    !matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0" | "false" | "off")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            body
        )
        .into_bytes()
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let xml = wrap("<w:p><w:r><w:t>Hello, world!</w:t></w:r></w:p>");
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.plain_text(), "Hello, world!");
        assert_eq!(doc.paragraphs[0].style_id, None);
    }

    #[test]
    fn test_parse_styled_paragraph() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.paragraphs[0].style_id.as_deref(), Some("Heading1"));
    }

    #[test]
    fn test_parse_run_formatting() {
        let xml = wrap(
            r#"<w:p>
                <w:r><w:rPr><w:b/><w:i w:val="0"/><w:color w:val="FF0000"/></w:rPr><w:t>#CITY</w:t></w:r>
                <w:r><w:rPr><w:color w:val="auto"/></w:rPr><w:t>plain</w:t></w:r>
            </w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        let runs = &doc.paragraphs[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].bold, Some(true));
        assert_eq!(runs[0].italic, Some(false));
        assert_eq!(runs[0].color, Some(Rgb::RED));
        assert_eq!(runs[1].bold, None);
        assert_eq!(runs[1].italic, None);
        assert_eq!(runs[1].color, None);
    }

    #[test]
    fn test_whitespace_and_control_characters() {
        let xml = wrap(
            r#"<w:p><w:r><w:t xml:space="preserve">  a </w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t><w:br w:type="page"/></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.paragraphs[0].runs[0].text, "  a \tb\nc");
    }

    #[test]
    fn test_escaped_text() {
        let xml = wrap("<w:p><w:r><w:t>Smith &amp; Sons &lt;LLC&gt;</w:t></w:r></w:p>");
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.plain_text(), "Smith & Sons <LLC>");
    }

    #[test]
    fn test_empty_runs_and_paragraphs_are_kept() {
        let xml = wrap(
            r#"<w:p/><w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.paragraphs.len(), 2);
        assert!(doc.paragraphs[0].runs.is_empty());
        assert_eq!(doc.paragraphs[1].runs.len(), 2);
        assert_eq!(doc.paragraphs[1].runs[0].text, "");
    }

    #[test]
    fn test_instr_text_is_ignored() {
        let xml = wrap(
            r#"<w:p><w:r><w:instrText>TOC \o "1-3"</w:instrText></w:r><w:r><w:t>Contents</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.plain_text(), "Contents");
    }

    #[test]
    fn test_hyperlink_runs_are_included() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>See </w:t></w:r><w:hyperlink w:anchor="x"><w:r><w:t>section 2</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.paragraphs[0].runs.len(), 2);
        assert_eq!(doc.plain_text(), "See section 2");
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>Intro</w:t></w:r></w:p>
               <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
               <w:p><w:r><w:t>Outro</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.plain_text(), "Intro\nOutro");
    }

    #[test]
    fn test_tab_stops_are_not_text() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>x</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.plain_text(), "x");
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(Document::parse(b"<w:document><w:body><w:p></w:body>").is_err());
    }

    #[test]
    fn test_shell_extraction() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body><w:p><w:pPr><w:sectPr><w:type w:val="nextPage"/></w:sectPr></w:pPr></w:p><w:p><w:r><w:t>Old</w:t></w:r></w:p><w:sectPr><w:headerReference w:type="default" r:id="rId8"/><w:pgSz w:w="12240" w:h="15840"/></w:sectPr></w:body></w:document>"#;

        let shell = BodyShell::extract(xml).unwrap();
        assert!(shell.root_start.starts_with("<w:document "));
        assert!(shell.root_start.contains("xmlns:r="));
        assert_eq!(shell.root_name, "w:document");
        assert_eq!(shell.body_name, "w:body");
        assert_eq!(
            shell.section_properties.as_deref(),
            Some(r#"<w:sectPr><w:headerReference w:type="default" r:id="rId8"/><w:pgSz w:w="12240" w:h="15840"/></w:sectPr>"#)
        );
    }

    #[test]
    fn test_shell_without_section_properties() {
        let shell = BodyShell::extract(&wrap("<w:p/>")).unwrap();
        assert!(shell.section_properties.is_none());
    }

    #[test]
    fn test_shell_requires_body() {
        let xml = br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        assert!(BodyShell::extract(xml).is_err());
    }
}
