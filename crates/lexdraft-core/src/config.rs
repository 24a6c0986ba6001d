//! Configuration settings (`lexdraft.toml`)
//!
//! Every section and field is optional; a missing file yields defaults.
//!
//! ```toml
//! [reconstruction]
//! fallback_style = "Normal"
//!
//! [assembly]
//! title_size_pt = 14
//! error_color = "FF0000"
//! page_breaks = true
//!
//! [blueprint]
//! path = "template_blueprint.jsonl"
//!
//! [generation]
//! case_summary_prompt = "Summarize the parties, dates and claims of this case."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lexdraft_ooxml::{AssemblyOptions, ReconstructOptions};
use lexdraft_records::Rgb;

use crate::error::Result;

/// Default configuration file name
pub const CONFIG_FILE: &str = "lexdraft.toml";

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Document reconstruction settings
    pub reconstruction: ReconstructionSettings,
    /// Multi-section assembly settings
    pub assembly: AssemblySettings,
    /// Blueprint artifact settings
    pub blueprint: BlueprintSettings,
    /// Prompt overrides for the generation pipeline
    pub generation: GenerationSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load settings from a file; a missing file yields defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }

    /// Options for a single reconstruction
    pub fn reconstruct_options(&self) -> ReconstructOptions {
        ReconstructOptions {
            fallback_style: self.reconstruction.fallback_style.clone(),
        }
    }

    /// Options for multi-section assembly
    pub fn assembly_options(&self) -> AssemblyOptions {
        let error_color = Rgb::from_hex(&self.assembly.error_color).unwrap_or_else(|| {
            warn!(
                value = %self.assembly.error_color,
                "invalid assembly.error_color, using red"
            );
            Rgb::RED
        });
        AssemblyOptions {
            title_size_pt: self.assembly.title_size_pt,
            error_color,
            page_breaks: self.assembly.page_breaks,
            reconstruct: self.reconstruct_options(),
        }
    }
}

/// Reconstruction configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReconstructionSettings {
    /// Style used when a record names a style the document lacks
    pub fallback_style: Option<String>,
}

/// Assembly configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// Section title size in points
    pub title_size_pt: u32,
    /// Hex color of error paragraphs
    pub error_color: String,
    /// Page break between sections
    pub page_breaks: bool,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            title_size_pt: 14,
            error_color: "FF0000".to_string(),
            page_breaks: true,
        }
    }
}

/// Blueprint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintSettings {
    /// Where the serializer persists the line-delimited records
    pub path: PathBuf,
}

impl Default for BlueprintSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("template_blueprint.jsonl"),
        }
    }
}

/// Prompt overrides; `None` uses the built-in prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GenerationSettings {
    /// Instruction sent with the case document
    pub case_summary_prompt: Option<String>,
    /// Instruction asking which forms the filing requires
    pub form_list_prompt: Option<String>,
}
