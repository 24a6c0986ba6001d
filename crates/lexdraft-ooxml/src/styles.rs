//! Style definitions parsing (word/styles.xml)
//!
//! Records refer to paragraph styles by their display name ("Heading 1",
//! "List Paragraph"), while document.xml refers to them by style ID
//! ("Heading1", "ListParagraph"). [`StyleSheet`] maps between the two.
//!
//! Word stores the names of many built-in styles in lowercase
//! (`<w:name w:val="heading 1"/>`) and shows them capitalized in its UI;
//! [`Style::display_name`] applies the same presentation.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Collection of styles from a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
    /// Style IDs in definition order
    order: Vec<String>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Name as stored in styles.xml
    pub name: String,
    /// Style type
    pub style_type: StyleType,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

/// Built-in styles whose stored names are lowercase
const LOWERCASE_BUILTINS: &[&str] = &[
    "normal",
    "title",
    "subtitle",
    "caption",
    "header",
    "footer",
    "heading ",
    "index ",
    "toc ",
    "footnote text",
    "endnote text",
    "annotation text",
    "list",
    "body text",
    "plain text",
];

impl Style {
    /// Name as presented to users and stored in records
    pub fn display_name(&self) -> String {
        let lower = self.name.as_str();
        if let Some(rest) = lower.strip_prefix("toc ") {
            return format!("TOC {}", rest);
        }
        let is_builtin = LOWERCASE_BUILTINS
            .iter()
            .any(|b| lower == b.trim_end() || (b.ends_with(' ') && lower.starts_with(b)));
        if is_builtin && lower.starts_with(|c: char| c.is_ascii_lowercase()) {
            lexdraft_records::normalize_style_name(lower)
        } else {
            self.name.clone()
        }
    }
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current_style: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        current_style = Some(StyleBuilder::from_element(e));
                    } else if let Some(builder) = current_style.as_mut() {
                        builder.apply(e);
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        // Self-closing style: nothing nested to collect
                        if let Some(style) = StyleBuilder::from_element(e).build() {
                            stylesheet.insert(style.0, style.1);
                        }
                    } else if let Some(builder) = current_style.as_mut() {
                        builder.apply(e);
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(style) = current_style.take().and_then(StyleBuilder::build) {
                            stylesheet.insert(style.0, style.1);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(stylesheet)
    }

    fn insert(&mut self, style: Style, is_default: bool) {
        if is_default && style.style_type == StyleType::Paragraph {
            self.default_paragraph = Some(style.id.clone());
        }
        if !self.styles.contains_key(&style.id) {
            self.order.push(style.id.clone());
        }
        self.styles.insert(style.id.clone(), style);
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Whether no styles are defined
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All styles in definition order
    pub fn all(&self) -> impl Iterator<Item = &Style> {
        self.order.iter().filter_map(|id| self.styles.get(id))
    }

    /// All paragraph styles in definition order
    pub fn paragraph_styles(&self) -> impl Iterator<Item = &Style> {
        self.all()
            .filter(|s| s.style_type == StyleType::Paragraph)
    }

    /// Display name of the paragraph style a paragraph uses
    ///
    /// `style_id` is the paragraph's `w:pStyle` value; `None` means the
    /// paragraph uses the default paragraph style.
    pub fn paragraph_style_name(&self, style_id: Option<&str>) -> String {
        let id = style_id.or(self.default_paragraph.as_deref());
        match id.and_then(|id| self.get(id)) {
            Some(style) => style.display_name(),
            None => id
                .map(str::to_string)
                .unwrap_or_else(|| lexdraft_records::DEFAULT_STYLE.to_string()),
        }
    }

    /// Find the paragraph style a record's style name refers to
    ///
    /// Matching order: display name, then style ID, then either of the two
    /// ignoring ASCII case.
    pub fn find_paragraph_style(&self, name: &str) -> Option<&Style> {
        self.paragraph_styles()
            .find(|s| s.display_name() == name)
            .or_else(|| self.paragraph_styles().find(|s| s.id == name))
            .or_else(|| {
                self.paragraph_styles().find(|s| {
                    s.display_name().eq_ignore_ascii_case(name) || s.id.eq_ignore_ascii_case(name)
                })
            })
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: Option<StyleType>,
    is_default: bool,
}

impl StyleBuilder {
    fn from_element(e: &BytesStart) -> Self {
        let style_type = get_attr(e, b"w:type").map(|t| match t.as_str() {
            "character" => StyleType::Character,
            "table" => StyleType::Table,
            "numbering" => StyleType::Numbering,
            _ => StyleType::Paragraph,
        });
        Self {
            id: get_attr(e, b"w:styleId"),
            style_type,
            is_default: matches!(get_attr(e, b"w:default").as_deref(), Some("1" | "true")),
            ..Self::default()
        }
    }

    fn apply(&mut self, e: &BytesStart) {
        if e.local_name().as_ref() == b"name" {
            self.name = get_attr(e, b"w:val");
        }
    }

    fn build(self) -> Option<(Style, bool)> {
        let id = self.id?;
        Some((
            Style {
                id: id.clone(),
                name: self.name.unwrap_or(id),
                style_type: self.style_type.unwrap_or(StyleType::Paragraph),
            },
            self.is_default,
        ))
    }
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| String::from_utf8(a.value.to_vec()).ok())
}
