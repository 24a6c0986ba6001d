//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lexdraft_core::config::CONFIG_FILE;
use lexdraft_core::{recover, Settings};
use lexdraft_ooxml::{serializer, DocumentAssembly, DocxWriter, Template};
use lexdraft_records::ParagraphRecord;

#[derive(Parser)]
#[command(name = "lexdraft")]
#[command(author, version, about = "Legal drafts from templates and generated text", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ./lexdraft.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serialize a DOCX template into a line-delimited blueprint
    Blueprint {
        /// Input DOCX template
        input: PathBuf,

        /// Output blueprint file (default: [blueprint] path from the config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recover paragraph records from a generated response
    Recover {
        /// File containing the generated text
        input: PathBuf,

        /// Output file for the line-delimited records (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a DOCX from a generated response
    Build {
        /// File containing the generated text
        input: PathBuf,

        /// Output DOCX file
        #[arg(short, long)]
        output: PathBuf,

        /// Base document supplying styles and page setup
        #[arg(short, long)]
        base: Option<PathBuf>,

        /// Treat the input as line-delimited records instead of generated text
        #[arg(long)]
        jsonl: bool,
    },

    /// Assemble several generated responses into one DOCX
    Assemble {
        /// Sections manifest (TOML with [[section]] entries)
        manifest: PathBuf,

        /// Output DOCX file
        #[arg(short, long)]
        output: PathBuf,

        /// Base document supplying styles and page setup
        #[arg(short, long)]
        base: Option<PathBuf>,
    },
}

/// Sections manifest for `lexdraft assemble`
///
/// ```toml
/// [[section]]
/// title = "CACI 4302: Termination for Failure to Pay Rent"
/// response = "responses/4302.txt"
/// ```
///
/// Response paths are relative to the manifest.
#[derive(Debug, Deserialize)]
struct SectionManifest {
    #[serde(rename = "section", default)]
    sections: Vec<SectionEntry>,
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    title: Option<String>,
    response: PathBuf,
}

/// Run the CLI application
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Blueprint { input, output } => {
            let output = output.unwrap_or_else(|| settings.blueprint.path.clone());
            blueprint_command(&input, &output)?;
        }
        Commands::Recover { input, output } => {
            recover_command(&input, output.as_deref())?;
        }
        Commands::Build {
            input,
            output,
            base,
            jsonl,
        } => {
            build_command(&input, &output, base.as_deref(), jsonl, &settings)?;
        }
        Commands::Assemble {
            manifest,
            output,
            base,
        } => {
            assemble_command(&manifest, &output, base.as_deref(), &settings)?;
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Load settings from a config file or use defaults
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Settings::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))
        }
        None => Settings::load(CONFIG_FILE)
            .with_context(|| format!("Failed to load config: {}", CONFIG_FILE)),
    }
}

/// Serialize a template into a blueprint file
pub fn blueprint_command(input: &Path, output: &Path) -> Result<()> {
    println!("lexdraft v{}", lexdraft_core::VERSION);
    println!("Serializing: {}", input.display());

    let mut template = Template::load(input)
        .with_context(|| format!("Failed to load template: {}", input.display()))?;
    let records = serializer::serialize_to_blueprint(&mut template, output)
        .with_context(|| format!("Failed to serialize template: {}", input.display()))?;

    let placeholders: usize = records.iter().map(|r| r.placeholders.len()).sum();
    println!("  {} paragraphs, {} placeholders", records.len(), placeholders);
    println!("  Written: {}", output.display());
    Ok(())
}

/// Recover records from generated text and write them as line-delimited JSON
pub fn recover_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let records = recover_file(input)?;
    let jsonl = lexdraft_records::to_json_lines(&records)?;

    match output {
        Some(path) => {
            fs::write(path, jsonl)
                .with_context(|| format!("Failed to write records: {}", path.display()))?;
            info!(records = records.len(), path = %path.display(), "wrote recovered records");
        }
        None => {
            io::stdout()
                .write_all(jsonl.as_bytes())
                .context("Failed to write records to stdout")?;
        }
    }
    Ok(())
}

/// Build a DOCX from generated text (or line-delimited records)
pub fn build_command(
    input: &Path,
    output: &Path,
    base: Option<&Path>,
    jsonl: bool,
    settings: &Settings,
) -> Result<()> {
    println!("lexdraft v{}", lexdraft_core::VERSION);
    println!("Building: {}", input.display());

    let records = if jsonl {
        let text = read_text(input)?;
        lexdraft_records::from_json_lines(&text)
            .with_context(|| format!("Failed to read records: {}", input.display()))?
    } else {
        recover_file(input)?
    };
    println!("  {} paragraphs", records.len());

    let base = load_base(base)?;
    let docx = DocxWriter::build_with_options(&records, base, &settings.reconstruct_options())
        .context("Failed to reconstruct document")?;

    fs::write(output, docx)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;
    println!("  Written: {}", output.display());
    Ok(())
}

/// Assemble the sections listed in a manifest into one DOCX
///
/// A section whose response cannot be read or recovered becomes an error
/// paragraph; the command still succeeds.
pub fn assemble_command(
    manifest_path: &Path,
    output: &Path,
    base: Option<&Path>,
    settings: &Settings,
) -> Result<()> {
    println!("lexdraft v{}", lexdraft_core::VERSION);
    println!("Assembling: {}", manifest_path.display());

    let text = read_text(manifest_path)?;
    let manifest: SectionManifest = toml::from_str(&text)
        .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))?;
    let root = manifest_path.parent().unwrap_or(Path::new("."));

    let mut assembly = DocumentAssembly::new(settings.assembly_options());
    for (i, entry) in manifest.sections.iter().enumerate() {
        let path = root.join(&entry.response);
        println!(
            "  Section {}/{}: {}",
            i + 1,
            manifest.sections.len(),
            entry.title.as_deref().unwrap_or("(untitled)")
        );
        match recover_file(&path) {
            Ok(records) => assembly.push_records(entry.title.clone(), records),
            Err(e) => {
                warn!(section = i, error = %e, "section could not be recovered");
                assembly.push_failure(entry.title.clone(), format!("{:#}", e));
            }
        }
    }

    let base = load_base(base)?;
    let assembled = assembly.build(base).context("Failed to assemble document")?;

    fs::write(output, &assembled.document)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;
    println!(
        "  {} sections, {} failed",
        assembly.len(),
        assembled.failures.len()
    );
    for failure in &assembled.failures {
        println!("    section {}: {}", failure.index + 1, failure.message);
    }
    println!("  Written: {}", output.display());
    Ok(())
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

fn recover_file(path: &Path) -> Result<Vec<ParagraphRecord>> {
    let text = read_text(path)?;
    recover(&text).with_context(|| format!("Failed to recover records from {}", path.display()))
}

fn load_base(base: Option<&Path>) -> Result<Option<Template>> {
    base.map(|path| {
        Template::load(path)
            .with_context(|| format!("Failed to load base document: {}", path.display()))
    })
    .transpose()
}
