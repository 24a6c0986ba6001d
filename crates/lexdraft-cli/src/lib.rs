//! lexdraft CLI - Command-line interface library
//!
//! This library provides the CLI functionality for lexdraft:
//! - Blueprint: serialize a DOCX template to line-delimited records
//! - Recover: recover records from a generated response
//! - Build: rebuild a styled DOCX from a generated response
//! - Assemble: combine several responses into one DOCX
//!
//! # Binary Usage
//!
//! ```bash
//! # Serialize the template used as generation context
//! lexdraft blueprint caci_template.docx -o template_blueprint.jsonl
//!
//! # Rebuild a form from a generated response, keeping the template's styles
//! lexdraft build response.txt -o caci_4302.docx --base caci_template.docx
//!
//! # Combine several responses, one section each
//! lexdraft assemble sections.toml -o final_output.docx --base caci_template.docx
//! ```

pub mod app;

// Re-export main entry point and commands
pub use app::{
    assemble_command, blueprint_command, build_command, load_settings, recover_command, run_cli,
};
