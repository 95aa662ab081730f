use std::path::PathBuf;

use clap::Parser;

use crate::config::{CaseMode, DomainFormat, ExportFormat, ExtractionMode};

/// Command-line interface definition.
/// Extracts domain names from text files, filters and reformats them, then
/// previews or exports the result.
///
/// Verbosity levels:
/// 0 - silent (only final output)
/// 1 - errors (default)
/// 2 - warnings + errors
/// 3 - info
/// 5 - trace/debug
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Extract, filter, format and export domain names found in text files"
)]
pub struct Cli {
    /// Input files to scan, processed in the given order
    #[arg(value_name = "FILE", required_unless_present_any = ["check", "generate_schema", "save_config"])]
    pub inputs: Vec<PathBuf>,

    /// Export the result to this file
    #[arg(short, long, value_name = "FILE", conflicts_with = "preview")]
    pub output: Option<PathBuf>,

    /// Print a preview instead of exporting (default when --output is absent)
    #[arg(long)]
    pub preview: bool,

    /// Maximum number of domains shown in a preview
    #[arg(long, value_name = "N")]
    pub preview_limit: Option<usize>,

    /// Load settings from a JSON config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the effective settings to a JSON config file
    #[arg(long, value_name = "FILE")]
    pub save_config: Option<PathBuf>,

    /// Extraction grammar
    #[arg(long, value_enum)]
    pub mode: Option<ExtractionMode>,

    /// Output letter case
    #[arg(long, value_enum)]
    pub case: Option<CaseMode>,

    /// Which part of each domain to emit
    #[arg(long, value_enum)]
    pub domain_format: Option<DomainFormat>,

    /// Export encoding (inferred from the --output extension when omitted)
    #[arg(long, value_enum)]
    pub export_format: Option<ExportFormat>,

    /// Allowed TLD (repeatable, e.g. --tld com --tld co.uk)
    #[arg(long = "tld", value_name = "TLD")]
    pub tlds: Vec<String>,

    /// Reject domains matching this wildcard pattern (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub blacklist: Vec<String>,

    /// Keep only domains matching this wildcard pattern (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub whitelist: Vec<String>,

    /// Render each domain through a template such as "||{domain}^"
    #[arg(long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// Text prepended to each domain (ignored with --template)
    #[arg(long)]
    pub prefix: Option<String>,

    /// Text appended to each domain (ignored with --template)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Separator for txt exports; "\n" and "\t" escapes are understood
    #[arg(long)]
    pub separator: Option<String>,

    /// Sort the final list
    #[arg(long)]
    pub sort: bool,

    /// Keep duplicate entries
    #[arg(long)]
    pub no_dedupe: bool,

    /// Do not strip a leading "www."
    #[arg(long)]
    pub keep_www: bool,

    /// Skip structural domain validation
    #[arg(long)]
    pub no_validate: bool,

    /// Minimum candidate length
    #[arg(long, value_name = "N")]
    pub min_length: Option<usize>,

    /// Maximum candidate length
    #[arg(long, value_name = "N")]
    pub max_length: Option<usize>,

    /// Characters replaced by spaces before extraction
    #[arg(long, value_name = "CHARS")]
    pub strip_chars: Option<String>,

    /// Also write run statistics as CSV to this file
    #[arg(long, value_name = "FILE")]
    pub stats_csv: Option<PathBuf>,

    /// Validate a single domain and exit
    #[arg(long, value_name = "DOMAIN")]
    pub check: Option<String>,

    /// Print the JSON schema of the json export format and exit
    #[arg(long)]
    pub generate_schema: bool,

    /// Verbosity level (0-5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }

    /// Show per-source progress lines on stderr?
    pub fn show_progress(&self) -> bool {
        self.verbose >= 3
    }

    /// Preview unless an output file was requested.
    pub fn is_preview(&self) -> bool {
        self.preview || self.output.is_none()
    }
}
