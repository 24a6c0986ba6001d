//! Line-delimited record artifact
//!
//! One compact JSON object per line, one line per paragraph, in document
//! order. This is the blueprint handed to the text-generation step as
//! context, so it must round-trip exactly.

use std::io::{BufRead, Write};

use crate::error::{RecordError, Result};
use crate::record::ParagraphRecord;

/// Encode records as line-delimited JSON (each line ends with `\n`)
pub fn to_json_lines(records: &[ParagraphRecord]) -> Result<String> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write records as line-delimited JSON
pub fn write_json_lines<W: Write>(mut writer: W, records: &[ParagraphRecord]) -> Result<()> {
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Decode line-delimited JSON; blank lines are skipped
pub fn from_json_lines(text: &str) -> Result<Vec<ParagraphRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| RecordError::InvalidLine {
                line: i + 1,
                source,
            })
        })
        .collect()
}

/// Read line-delimited JSON from any buffered reader
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<ParagraphRecord>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| RecordError::InvalidLine {
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
