//! Unified error handling.
//!
//! All library failures flow through [`ExtractorError`], a `thiserror`-based
//! enum with:
//!   * Typed variants for each failure domain of a pipeline run
//!   * A categorization layer (`ErrorCategory`) for reporting
//!   * Helper constructors
//!   * `From` conversions for lower-level errors
//!
//! A run that finds nothing is *not* an error: see
//! [`crate::pipeline::RunOutcome::NoResults`].
//!
//! Usage:
//!   use domainextractor::errors::{Result, ExtractorError};
//!
//!   fn do_something() -> Result<()> {
//!       Err(ExtractorError::internal("worker stopped"))
//!   }
//!
//! NOTE: Variants that wrap external errors retain sources to preserve backtraces
//!       (when RUST_BACKTRACE=1).

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::stats::RunStatistics;

/// High-level classification for structured reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Export,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Export => "export",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary library error type.
#[derive(Error, Debug)]
pub enum ExtractorError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Failed to read input source {source_label}: {source}")]
    SourceRead {
        source_label: String,
        #[source]
        source: io::Error,
    },

    #[error("No input sources were provided")]
    NoSources,

    // ------------------------- Configuration --------------------------------
    #[error(transparent)]
    ConfigFile(#[from] ConfigError),

    // ----------------------------- Export -----------------------------------
    #[error("Failed to export {count} domain(s) to {target}: {source}")]
    Export {
        target: String,
        count: usize,
        /// Statistics of the run that succeeded before the export failed.
        statistics: Box<RunStatistics>,
        #[source]
        source: io::Error,
    },

    #[error("Failed to render {format} output: {reason}")]
    Render { format: String, reason: String },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    // ---------------------------- Internal ----------------------------------
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ExtractorError {
    /// Categorize the error for structured output.
    pub fn category(&self) -> ErrorCategory {
        use ExtractorError::*;
        match self {
            SourceRead { .. } | NoSources => ErrorCategory::Input,
            ConfigFile(_) => ErrorCategory::Configuration,
            Export { .. } | Render { .. } => ErrorCategory::Export,
            Io { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Statistics computed before the failure, if the run got that far.
    pub fn statistics(&self) -> Option<&RunStatistics> {
        match self {
            ExtractorError::Export { statistics, .. } => Some(statistics),
            _ => None,
        }
    }

    // ---------------------------- Constructors -----------------------------

    pub fn source_read(source_label: impl Into<String>, source: io::Error) -> Self {
        Self::SourceRead {
            source_label: source_label.into(),
            source,
        }
    }

    pub fn export(
        target: impl Into<String>,
        count: usize,
        statistics: RunStatistics,
        source: io::Error,
    ) -> Self {
        Self::Export {
            target: target.into(),
            count,
            statistics: Box::new(statistics),
            source,
        }
    }

    pub fn render(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Render {
            format: format.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_with(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Map standard IO errors into `Io` variant (generic context).
impl From<io::Error> for ExtractorError {
    fn from(e: io::Error) -> Self {
        ExtractorError::Io {
            path: "<unknown>".into(),
            operation: "unspecified".into(),
            source: e,
        }
    }
}

impl From<tokio::task::JoinError> for ExtractorError {
    fn from(e: tokio::task::JoinError) -> Self {
        ExtractorError::internal_with("pipeline worker terminated abnormally", e)
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| ExtractorError::io(path.into(), operation.into(), e))
    }
}
