use std::path::{Path, PathBuf};

use crate::config::ExtractionConfig;
use crate::domain_utils::{self, DomainViolation};
use crate::errors::Result;
use crate::formatter;
use crate::pipeline::{self, ExtractionPipeline, RunOutcome, RunRequest};
use crate::sources::InputSource;
use crate::stats::History;

/// High-level façade providing library-consumable entry points.
///
/// Wraps the pipeline for embedding in other Rust applications without
/// the CLI's printing or queueing.
///
/// - In-memory helpers never touch the filesystem.
/// - File helpers validate the configuration before reading anything.
pub struct DomainExtractor;

impl DomainExtractor {
    /// Extract, filter and format domains from a string.
    ///
    /// Deduplication and sorting follow the config; the preview limit does
    /// not apply.
    pub fn extract_domains(text: &str, config: &ExtractionConfig) -> Result<Vec<String>> {
        config.validate()?;
        let runner = ExtractionPipeline::new(config);
        let (mut domains, _) =
            runner.collect(&[InputSource::text("<memory>", text)], &mut |_| {})?;
        if config.dedupe {
            domains = pipeline::dedupe(domains);
        }
        if config.sort {
            domains.sort();
        }
        Ok(domains)
    }

    /// Preview the files, truncated to the configured limit.
    pub fn preview_files<P: AsRef<Path>>(
        paths: &[P],
        config: &ExtractionConfig,
    ) -> Result<RunOutcome> {
        config.validate()?;
        ExtractionPipeline::new(config).run(&RunRequest::preview(to_sources(paths)))
    }

    /// Export the files to `target`, recording the run in `history` when it
    /// produced output.
    pub fn export_files<P: AsRef<Path>>(
        paths: &[P],
        target: impl Into<PathBuf>,
        config: &ExtractionConfig,
        history: &mut History,
    ) -> Result<RunOutcome> {
        config.validate()?;
        let outcome =
            ExtractionPipeline::new(config).run(&RunRequest::export(to_sources(paths), target))?;
        if let Some(entry) = outcome.history_entry() {
            history.push(entry);
        }
        Ok(outcome)
    }

    /// Format a single accepted domain the way a run would.
    pub fn format_domain(domain: &str, config: &ExtractionConfig) -> String {
        formatter::format_domain(domain, config)
    }

    /// Structural check of a single, already normalised domain.
    pub fn check_domain(domain: &str) -> std::result::Result<(), DomainViolation> {
        domain_utils::check(domain)
    }
}

fn to_sources<P: AsRef<Path>>(paths: &[P]) -> Vec<InputSource> {
    paths
        .iter()
        .map(|p| InputSource::path(p.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DomainFormat, ExtractionMode};

    #[test]
    fn in_memory_extraction() {
        let config = ExtractionConfig::default();
        let domains =
            DomainExtractor::extract_domains("see www.Example.com and example.com", &config)
                .unwrap();
        assert_eq!(domains, vec!["example.com"]);
    }

    #[test]
    fn in_memory_email_mode() {
        let mut config = ExtractionConfig::default();
        config.mode = ExtractionMode::Email;
        config.domain_format = DomainFormat::OnlyTld;
        config.dedupe = false;
        let domains =
            DomainExtractor::extract_domains("a@x.com, b@y.com, c@z.net", &config).unwrap();
        assert_eq!(domains, vec![".com", ".com", ".net"]);
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut config = ExtractionConfig::default();
        config.preview_limit = 0;
        assert!(DomainExtractor::extract_domains("example.com", &config).is_err());
    }

    #[test]
    fn file_export_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.log");
        std::fs::write(&input, "GET http://cdn.example.net/index\nhost=api.example.org\n").unwrap();

        let mut history = History::default();
        let config = ExtractionConfig::default();
        let outcome = DomainExtractor::export_files(
            &[&input],
            dir.path().join("out.txt"),
            &config,
            &mut history,
        )
        .unwrap();

        assert_eq!(outcome.domains(), ["cdn.example.net", "api.example.org"]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn format_single_domain() {
        let mut config = ExtractionConfig::default();
        config.prefix = "0.0.0.0 ".to_string();
        assert_eq!(
            DomainExtractor::format_domain("www.ads.example.com", &config),
            "0.0.0.0 ads.example.com"
        );
    }

    #[test]
    fn check_domain_reports_violation() {
        assert!(DomainExtractor::check_domain("example.com").is_ok());
        assert_eq!(
            DomainExtractor::check_domain("localhost"),
            Err(DomainViolation::TooFewLabels)
        );
    }
}
