//! DomainExtractor Library
//!
//! A Rust library for pulling domain names out of unstructured text
//! (logs, mail dumps, exported pages) and turning them into clean lists.
//! This library provides functionality to:
//!
//! - Decode input files (UTF-8, UTF-16 with BOM, Latin-1 fallback)
//! - Extract candidates with one of several grammars (standard, aggressive, email, url)
//! - Filter by length, structure, TLD set and wildcard black/whitelists
//! - Reformat (case, label slicing, templates) and deduplicate
//! - Export as txt, csv, json or xml, serialized through a job queue
//!
//! # Example
//!
//! ```rust
//! use domainextractor::{DomainExtractor, ExtractionConfig};
//!
//! let config = ExtractionConfig::default();
//! let domains = DomainExtractor::extract_domains(
//!     "mirror at https://www.example.com/dl, contact admin@example.org",
//!     &config,
//! )?;
//! assert_eq!(domains, vec!["example.com"]);
//! # Ok::<(), domainextractor::ExtractorError>(())
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod domain_utils;
pub mod errors;
pub mod extractor;
pub mod facade;
pub mod filter;
pub mod formatter;
pub mod logging;
pub mod output;
pub mod pattern;
pub mod pipeline;
pub mod queue;
pub mod sources;
pub mod stats;
pub mod structured_output;
pub mod styled_output;

// Re-export commonly used types and functions for convenience
pub use config::{CaseMode, DomainFormat, ExportFormat, ExtractionConfig, ExtractionMode};
pub use errors::{ExtractorError, Result};
pub use facade::DomainExtractor;
pub use filter::{DomainFilter, Rejection};
pub use formatter::format_domain;
pub use output::{DomainExporter, create_exporter};
pub use pipeline::{ExtractionPipeline, PipelineEvent, PipelineState, RunOutcome, RunRequest};
pub use queue::TaskQueue;
pub use sources::InputSource;
pub use stats::{History, HistoryEntry, RunStatistics};
pub use styled_output::StyledFormatter;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
