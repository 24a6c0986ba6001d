//! Record recovery
//!
//! Generated text is supposed to be a JSON array of paragraph records, but
//! in practice it arrives wrapped in code fences, with the enclosing
//! brackets missing, or as objects written back to back. Recovery applies a
//! fixed set of repairs, in order, and then decodes strictly:
//!
//! 1. the first fenced block tagged `json` (any case), if there is one;
//! 2. otherwise the first fenced block of any kind;
//! 3. otherwise the whole text, trimmed;
//! 4. `}` `{` pairs separated only by whitespace and at most one comma
//!    become `},{`;
//! 5. a missing leading `[` is prepended, a missing trailing `]` appended;
//! 6. the result is decoded; failure is [`CoreError::MalformedRecord`].
//!
//! No other repair is attempted. Text that still does not decode is an
//! error, never a truncated or partial result.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use lexdraft_records::ParagraphRecord;

use crate::error::{CoreError, Result};

/// Where the candidate block was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    /// A fenced block tagged `json`
    JsonFence,
    /// A fenced block with another tag or none
    Fence,
    /// No fence: the whole text
    Bare,
}

fn json_fence() -> &'static Regex {
    static JSON_FENCE: OnceLock<Regex> = OnceLock::new();
    JSON_FENCE.get_or_init(|| Regex::new(r"(?s)```(?i:json)\b\s*(.*?)\s*```").unwrap())
}

fn any_fence() -> &'static Regex {
    static ANY_FENCE: OnceLock<Regex> = OnceLock::new();
    ANY_FENCE.get_or_init(|| Regex::new(r"(?s)```[A-Za-z0-9_+.-]*\s*(.*?)\s*```").unwrap())
}

fn adjacent_objects() -> &'static Regex {
    static ADJACENT: OnceLock<Regex> = OnceLock::new();
    ADJACENT.get_or_init(|| Regex::new(r"\}\s*,?\s*\{").unwrap())
}

/// Select the candidate block of generated text
///
/// ```
/// use lexdraft_core::recovery::{extract_block, BlockSource};
///
/// let raw = "Here you go:\n```json\n[{\"style\": \"Normal\"}]\n```\n";
/// assert_eq!(extract_block(raw), ("[{\"style\": \"Normal\"}]", BlockSource::JsonFence));
/// ```
pub fn extract_block(raw: &str) -> (&str, BlockSource) {
    if let Some(block) = json_fence().captures(raw).and_then(|c| c.get(1)) {
        return (block.as_str().trim(), BlockSource::JsonFence);
    }
    if let Some(block) = any_fence().captures(raw).and_then(|c| c.get(1)) {
        return (block.as_str().trim(), BlockSource::Fence);
    }
    (raw.trim(), BlockSource::Bare)
}

/// Apply the adjacency and bracket repairs to a candidate block
pub fn repair(block: &str) -> String {
    let joined = adjacent_objects().replace_all(block, "},{");
    if joined != block {
        debug!("joined adjacent objects");
    }

    let mut repaired = joined.into_owned();
    if !repaired.starts_with('[') {
        repaired.insert(0, '[');
        debug!("prepended missing array bracket");
    }
    if !repaired.ends_with(']') {
        repaired.push(']');
        debug!("appended missing array bracket");
    }
    repaired
}

/// Recover an array of any record type from generated text
pub fn recover_array<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let (block, source) = extract_block(raw);
    debug!(?source, len = block.len(), "selected candidate block");

    // An empty block would otherwise repair to `[]`
    if block.is_empty() {
        return Err(malformed(block.to_string()));
    }

    let repaired = repair(block);
    match serde_json::from_str(&repaired) {
        Ok(items) => Ok(items),
        Err(source) => Err(CoreError::MalformedRecord {
            source,
            fragment: repaired,
        }),
    }
}

fn malformed(fragment: String) -> CoreError {
    let source = match serde_json::from_str::<serde_json::Value>(&fragment) {
        Err(e) => e,
        // unreachable for the empty input this is used with
        Ok(_) => serde_json::Error::io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "no structured content",
        )),
    };
    CoreError::MalformedRecord { source, fragment }
}

/// Recover paragraph records from generated text
///
/// Each record's style name gets its first character capitalized.
///
/// ```
/// let raw = r#"{"style": "normal", "runs": []} {"style": "heading 1", "runs": []}"#;
/// let records = lexdraft_core::recover(raw)?;
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].style, "Heading 1");
/// # Ok::<(), lexdraft_core::CoreError>(())
/// ```
pub fn recover(raw: &str) -> Result<Vec<ParagraphRecord>> {
    let mut records: Vec<ParagraphRecord> = recover_array(raw)?;
    for record in &mut records {
        record.normalize_style();
    }
    debug!(records = records.len(), "recovered records");
    Ok(records)
}

/// A form the filing requires, as listed by the generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRequest {
    /// Form number; the generator emits it as a string or an integer
    #[serde(rename = "CACI Number", alias = "number", deserialize_with = "number_or_text")]
    pub number: String,
    /// Form title
    #[serde(rename = "Jury Instructions", alias = "title")]
    pub title: String,
}

impl FormRequest {
    /// Create a form request
    pub fn new(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            title: title.into(),
        }
    }

    /// Section title used in the assembled document
    pub fn heading(&self) -> String {
        format!("CACI {}: {}", self.number, self.title)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

fn number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => n.to_string(),
        NumberOrText::Text(s) => s,
    })
}

/// Recover the list of forms a filing requires
pub fn recover_forms(raw: &str) -> Result<Vec<FormRequest>> {
    let forms: Vec<FormRequest> = recover_array(raw)?;
    debug!(forms = forms.len(), "recovered form list");
    Ok(forms)
}
