//! Extraction pipeline orchestration.
//!
//! One run walks every source through read → extract → filter → format,
//! then optionally deduplicates and sorts the combined sequence and either
//! returns a preview or exports it. Progress and state transitions are
//! reported to an observer callback so a caller on another thread can
//! follow along.
//!
//! ```text
//! Idle → Reading → Extracting → Filtering → Formatting
//!      → [Deduplicating] → [Sorting] → Exporting | Previewing → Idle
//! ```
//!
//! Failure to read any source aborts the whole run before anything is
//! written.

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use indexmap::IndexSet;

use crate::config::{ExportFormat, ExtractionConfig};
use crate::domain_utils::tld_of;
use crate::errors::{ExtractorError, Result};
use crate::extractor;
use crate::filter::DomainFilter;
use crate::formatter::format_domain;
use crate::output;
use crate::sources::InputSource;
use crate::stats::{HistoryEntry, RunStatistics};

/// Pipeline stage currently executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Reading,
    Extracting,
    Filtering,
    Formatting,
    Deduplicating,
    Sorting,
    Exporting,
    Previewing,
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PipelineState::Idle => "idle",
            PipelineState::Reading => "reading",
            PipelineState::Extracting => "extracting",
            PipelineState::Filtering => "filtering",
            PipelineState::Formatting => "formatting",
            PipelineState::Deduplicating => "deduplicating",
            PipelineState::Sorting => "sorting",
            PipelineState::Exporting => "exporting",
            PipelineState::Previewing => "previewing",
        };
        f.write_str(s)
    }
}

/// Notifications emitted while a run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    State(PipelineState),
    /// A source finished; `completed` of `total` are done
    Progress { completed: usize, total: usize },
}

impl PipelineEvent {
    /// Fraction of sources completed, for progress events.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            PipelineEvent::Progress { completed, total } if *total > 0 => {
                Some(*completed as f64 / *total as f64)
            }
            _ => None,
        }
    }
}

/// What to do with the final sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum RunTarget {
    /// Return at most `preview_limit` domains; no export, no history
    Preview,
    /// Write to a file in the configured export format
    Export(PathBuf),
}

/// A single pipeline invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub sources: Vec<InputSource>,
    pub target: RunTarget,
}

impl RunRequest {
    pub fn preview(sources: Vec<InputSource>) -> Self {
        Self {
            sources,
            target: RunTarget::Preview,
        }
    }

    pub fn export(sources: Vec<InputSource>, path: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            target: RunTarget::Export(path.into()),
        }
    }
}

/// Successful end states of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Preview {
        /// First `preview_limit` domains
        domains: Vec<String>,
        /// Size of the full sequence before truncation
        total: usize,
        statistics: RunStatistics,
    },
    Exported {
        domains: Vec<String>,
        target: PathBuf,
        format: ExportFormat,
        statistics: RunStatistics,
    },
    /// Nothing survived filtering; export was not attempted
    NoResults { statistics: RunStatistics },
}

impl RunOutcome {
    pub fn statistics(&self) -> &RunStatistics {
        match self {
            RunOutcome::Preview { statistics, .. }
            | RunOutcome::Exported { statistics, .. }
            | RunOutcome::NoResults { statistics } => statistics,
        }
    }

    pub fn domains(&self) -> &[String] {
        match self {
            RunOutcome::Preview { domains, .. } | RunOutcome::Exported { domains, .. } => domains,
            RunOutcome::NoResults { .. } => &[],
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, RunOutcome::NoResults { .. })
    }

    /// History record for an exported run; previews and empty runs are not kept.
    pub fn history_entry(&self) -> Option<HistoryEntry> {
        match self {
            RunOutcome::Exported {
                domains,
                target,
                format,
                statistics,
            } => Some(HistoryEntry {
                timestamp: Utc::now(),
                domains: domains.clone(),
                statistics: statistics.clone(),
                target: target.display().to_string(),
                format: *format,
            }),
            _ => None,
        }
    }
}

/// Pipeline bound to one configuration. Patterns are compiled once here.
pub struct ExtractionPipeline<'a> {
    config: &'a ExtractionConfig,
    filter: DomainFilter,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            config,
            filter: DomainFilter::new(config),
        }
    }

    /// Run without observing progress.
    pub fn run(&self, request: &RunRequest) -> Result<RunOutcome> {
        self.run_with(request, &mut |_| {})
    }

    /// Run, reporting every state change and per-source progress.
    pub fn run_with(
        &self,
        request: &RunRequest,
        observer: &mut dyn FnMut(PipelineEvent),
    ) -> Result<RunOutcome> {
        let result = self.execute(request, observer);
        observer(PipelineEvent::State(PipelineState::Idle));
        if let Err(ref e) = result {
            tracing::error!(category = %e.category(), "pipeline run failed: {e}");
        }
        result
    }

    /// Read, extract, filter and format every source, in order.
    pub fn collect(
        &self,
        sources: &[InputSource],
        observer: &mut dyn FnMut(PipelineEvent),
    ) -> Result<(Vec<String>, RunStatistics)> {
        let mut stats = RunStatistics::default();
        let mut formatted = Vec::new();
        let total = sources.len();

        for (index, source) in sources.iter().enumerate() {
            let label = source.label();

            observer(PipelineEvent::State(PipelineState::Reading));
            let decoded = source.read(self.config.default_encoding)?;
            if decoded.lossy {
                tracing::warn!(
                    source = %label,
                    encoding = %decoded.encoding,
                    "undecodable bytes replaced while reading source"
                );
            }
            tracing::debug!(source = %label, chars = decoded.text.len(), "source read");

            observer(PipelineEvent::State(PipelineState::Extracting));
            let candidates =
                extractor::extract(&decoded.text, self.config.mode, &self.config.strip_chars);
            stats.total_extracted += candidates.len();

            observer(PipelineEvent::State(PipelineState::Filtering));
            let mut accepted = Vec::with_capacity(candidates.len());
            for candidate in candidates {
                match self.filter.evaluate(&candidate) {
                    Ok(()) => {
                        stats.record_tld(tld_of(&candidate));
                        accepted.push(candidate);
                    }
                    Err(reason) => stats.record_rejection(reason),
                }
            }
            stats.valid_domains += accepted.len();

            observer(PipelineEvent::State(PipelineState::Formatting));
            formatted.extend(accepted.iter().map(|d| format_domain(d, self.config)));

            tracing::info!(
                source = %label,
                accepted = accepted.len(),
                "source processed"
            );
            stats.files_processed += 1;
            stats.sources.push(label);
            observer(PipelineEvent::Progress {
                completed: index + 1,
                total,
            });
        }

        Ok((formatted, stats))
    }

    fn execute(
        &self,
        request: &RunRequest,
        observer: &mut dyn FnMut(PipelineEvent),
    ) -> Result<RunOutcome> {
        if request.sources.is_empty() {
            return Err(ExtractorError::NoSources);
        }
        let start = Instant::now();

        let (mut domains, mut stats) = self.collect(&request.sources, observer)?;

        if domains.is_empty() {
            stats.processing_time = start.elapsed();
            tracing::info!(
                extracted = stats.total_extracted,
                "no domains survived filtering"
            );
            return Ok(RunOutcome::NoResults { statistics: stats });
        }

        if self.config.dedupe {
            observer(PipelineEvent::State(PipelineState::Deduplicating));
            let before = domains.len();
            domains = dedupe(domains);
            stats.duplicates_removed = before - domains.len();
        }

        if self.config.sort {
            observer(PipelineEvent::State(PipelineState::Sorting));
            domains.sort();
        }

        stats.final_count = domains.len();

        match &request.target {
            RunTarget::Preview => {
                observer(PipelineEvent::State(PipelineState::Previewing));
                let total = domains.len();
                domains.truncate(self.config.preview_limit);
                stats.processing_time = start.elapsed();
                Ok(RunOutcome::Preview {
                    domains,
                    total,
                    statistics: stats,
                })
            }
            RunTarget::Export(path) => {
                observer(PipelineEvent::State(PipelineState::Exporting));
                stats.processing_time = start.elapsed();
                let format = self.config.export_format;
                output::export(&domains, path, format, self.config, &stats)?;
                Ok(RunOutcome::Exported {
                    domains,
                    target: path.clone(),
                    format,
                    statistics: stats,
                })
            }
        }
    }
}

/// Keep the first occurrence of every entry, preserving order.
pub fn dedupe(domains: Vec<String>) -> Vec<String> {
    domains.into_iter().collect::<IndexSet<String>>().into_iter().collect()
}
