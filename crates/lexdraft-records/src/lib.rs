//! lexdraft-records - Paragraph record definitions
//!
//! This crate provides the record types exchanged between the template
//! serializer, the record recovery parser and the document reconstructor:
//!
//! - [`ParagraphRecord`]: one paragraph (style name, ordered runs, placeholders)
//! - [`RunRecord`]: one contiguously styled text span
//! - [`PlaceholderRecord`]: a run detected as an unfilled template slot
//! - [`ColorValue`] / [`Rgb`]: run colors and their resolution rules
//!
//! Records persist as line-delimited JSON (one compact object per line),
//! see [`lines`].
//!
//! # Example
//!
//! ```
//! use lexdraft_records::{ParagraphRecord, RunRecord, Rgb};
//!
//! let record = ParagraphRecord::new("Normal")
//!     .with_run(RunRecord::new("The defendant, "))
//!     .with_run(RunRecord::new("#DEFENDANT").with_color(Rgb::RED));
//!
//! let jsonl = lexdraft_records::to_json_lines(&[record.clone()]).unwrap();
//! let restored = lexdraft_records::from_json_lines(&jsonl).unwrap();
//! assert_eq!(restored, vec![record]);
//! ```

pub mod color;
pub mod error;
pub mod lines;
pub mod record;

pub use color::{resolve_color, ColorValue, Rgb};
pub use error::{RecordError, Result};
pub use lines::{from_json_lines, read_json_lines, to_json_lines, write_json_lines};
pub use record::{
    is_placeholder, normalize_style_name, ParagraphRecord, PlaceholderRecord, RunRecord,
    DEFAULT_STYLE,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
