//! Paragraph, run and placeholder records

use serde::{Deserialize, Deserializer, Serialize};

use crate::color::{ColorValue, Rgb};

/// Style used when a record does not name one
pub const DEFAULT_STYLE: &str = "Normal";

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn style_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_style))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An absent flag is an explicit `false`; only `null` inherits
fn flag_unset() -> Option<bool> {
    Some(false)
}

fn nullable_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Option::<bool>::deserialize(deserializer)
}

/// One logical paragraph
///
/// `runs` is optional at the type level: recovered text may omit it, and the
/// reconstructor reports that as a missing field for the record's index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    /// Paragraph style name (display name, e.g. "Heading 1"); absent or
    /// `null` means [`DEFAULT_STYLE`]
    #[serde(default = "default_style", deserialize_with = "style_or_default")]
    pub style: String,
    /// Runs in rendering order
    #[serde(default)]
    pub runs: Option<Vec<RunRecord>>,
    /// Placeholders detected during serialization
    #[serde(default, deserialize_with = "null_as_default")]
    pub placeholders: Vec<PlaceholderRecord>,
}

/// One contiguously styled text span
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunRecord {
    /// Literal text, rendered as given
    #[serde(default)]
    pub text: Option<String>,
    /// Bold flag; `None` (`null`) leaves the run without an explicit
    /// setting, an absent key decodes as `Some(false)`
    #[serde(default = "flag_unset", deserialize_with = "nullable_flag")]
    pub bold: Option<bool>,
    /// Italic flag, decoded like `bold`
    #[serde(default = "flag_unset", deserialize_with = "nullable_flag")]
    pub italic: Option<bool>,
    /// Run color; see [`crate::color`]
    #[serde(default)]
    pub color: Option<ColorValue>,
}

/// A run flagged as an unfilled template slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRecord {
    /// Literal text of the run
    #[serde(rename = "placeholder", default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Zero-based index of the run within its paragraph
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: usize,
}

impl ParagraphRecord {
    /// Create an empty paragraph with the given style
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            runs: Some(Vec::new()),
            placeholders: Vec::new(),
        }
    }

    /// Append a run (builder style)
    pub fn with_run(mut self, run: RunRecord) -> Self {
        self.push_run(run);
        self
    }

    /// Append a run, recording it as a placeholder when it matches the
    /// placeholder heuristic
    pub fn push_run(&mut self, run: RunRecord) {
        let runs = self.runs.get_or_insert_with(Vec::new);
        let position = runs.len();
        if let Some(text) = run.text.as_deref() {
            if is_placeholder(text, run.explicit_color()) {
                self.placeholders.push(PlaceholderRecord {
                    text: text.to_string(),
                    position,
                });
            }
        }
        runs.push(run);
    }

    /// Runs in order; empty when the field is missing
    pub fn runs(&self) -> &[RunRecord] {
        self.runs.as_deref().unwrap_or_default()
    }

    /// Concatenated text of all runs
    pub fn plain_text(&self) -> String {
        self.runs()
            .iter()
            .filter_map(|r| r.text.as_deref())
            .collect()
    }

    /// Capitalize the first character of the style name in place
    pub fn normalize_style(&mut self) {
        self.style = normalize_style_name(&self.style);
    }
}

impl RunRecord {
    /// Create a run with text and no explicit formatting
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Set the bold flag
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set the italic flag
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set an explicit color
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color.into());
        self
    }

    /// The explicit color this run resolves to, if any
    pub fn explicit_color(&self) -> Option<Rgb> {
        crate::color::resolve_color(self.color.as_ref())
    }
}

/// Placeholder heuristic: text contains `#` and the explicit color is pure red
pub fn is_placeholder(text: &str, color: Option<Rgb>) -> bool {
    text.contains('#') && color == Some(Rgb::RED)
}

/// Capitalize the first character of a style name, leaving the rest as is
///
/// ```
/// use lexdraft_records::normalize_style_name;
///
/// assert_eq!(normalize_style_name("normal"), "Normal");
/// assert_eq!(normalize_style_name("heading 1"), "Heading 1");
/// assert_eq!(normalize_style_name("List Paragraph"), "List Paragraph");
/// ```
pub fn normalize_style_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
