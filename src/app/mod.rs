//! High-level application orchestration.
//!
//! This module provides the CLI-facing `App` façade. It resolves the
//! effective configuration, hands the run to the job queue and renders the
//! outcome for humans.
//!
//! Major steps in `App::run`:
//!   1. Schema generation / single-domain check early exits
//!   2. Config load (file, environment, CLI) and validation
//!   3. Optional config save
//!   4. Queued pipeline run with progress logging
//!   5. Styled rendering, optional statistics CSV
//!
//! Exit codes: 0 for success (including runs with no matching domains),
//! 1 for invalid input, configuration or export failures.

use std::fs;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::Cli;
use crate::config::ExtractionConfig;
use crate::domain_utils;
use crate::errors::{IoResultExt, Result};
use crate::extractor::normalize_candidate;
use crate::pipeline::{PipelineEvent, RunOutcome, RunRequest};
use crate::queue::TaskQueue;
use crate::sources::InputSource;
use crate::structured_output::ExportDocument;
use crate::styled_output::StyledFormatter;

/// Application façade.
pub struct App;

impl App {
    /// Execute the end-to-end extraction workflow.
    ///
    /// Returns: intended process exit code. `Err` is reserved for failures
    /// outside the pipeline itself (terminal output, side files).
    pub async fn run(cli: &Cli) -> anyhow::Result<i32> {
        let formatter = if cli.no_color {
            StyledFormatter::without_colors()
        } else {
            StyledFormatter::new()
        };

        if Self::maybe_print_schema(cli) {
            return Ok(0);
        }
        if let Some(code) = Self::maybe_check_domain(cli, &formatter) {
            return Ok(code);
        }

        let config = match Self::load_config(cli) {
            Ok(config) => config,
            Err(e) => {
                if cli.error_enabled() {
                    eprintln!("Configuration error: {e}");
                }
                return Ok(1);
            }
        };

        if let Some(ref path) = cli.save_config {
            config
                .save(path)
                .with_context(|| format!("saving configuration to {}", path.display()))?;
            tracing::info!(path = %path.display(), "configuration saved");
            if cli.inputs.is_empty() {
                return Ok(0);
            }
        }

        let sources: Vec<InputSource> = cli.inputs.iter().cloned().map(InputSource::Path).collect();
        let request = match cli.output {
            Some(ref target) if !cli.is_preview() => RunRequest::export(sources, target),
            _ => RunRequest::preview(sources),
        };

        let queue = TaskQueue::start(config.history_capacity);
        let result = Self::run_queued(&queue, Arc::new(config), request).await;
        let history = queue.history();
        queue.shutdown().await?;

        match result {
            Ok(outcome) => {
                formatter.print_outcome(&outcome)?;
                if cli.show_progress() && !history.is_empty() {
                    formatter.print_history(&history)?;
                }
                if let Some(ref path) = cli.stats_csv {
                    fs::write(path, outcome.statistics().to_csv())
                        .with_path(path.display().to_string(), "write statistics")?;
                }
                Ok(0)
            }
            Err(e) => {
                if cli.error_enabled() {
                    eprintln!("Error: {e}");
                    if let Some(stats) = e.statistics() {
                        eprintln!(
                            "  ({} domain(s) were ready; processing took {})",
                            stats.final_count,
                            stats.formatted_duration()
                        );
                    }
                }
                Ok(1)
            }
        }
    }
}

/// Helpers: early exits
impl App {
    fn maybe_print_schema(cli: &Cli) -> bool {
        if cli.generate_schema {
            match ExportDocument::generate_json_schema() {
                Ok(schema) => println!("{schema}"),
                Err(e) => eprintln!("Error generating JSON schema: {e}"),
            }
            return true;
        }
        false
    }

    fn maybe_check_domain(cli: &Cli, formatter: &StyledFormatter) -> Option<i32> {
        let raw = cli.check.as_deref()?;
        let domain = normalize_candidate(raw.trim());
        let verdict = domain_utils::check(&domain);
        println!("{}", formatter.format_check(&domain, &verdict));
        Some(if verdict.is_ok() { 0 } else { 1 })
    }
}

/// Helpers: configuration and execution
impl App {
    /// Defaults, then the config file, then environment, then CLI flags.
    fn load_config(cli: &Cli) -> Result<ExtractionConfig> {
        let mut config = match cli.config {
            Some(ref path) => ExtractionConfig::from_file(path)?,
            None => ExtractionConfig::default(),
        };
        config.apply_env();
        config.merge_with_cli(cli);
        config.validate()?;
        if cli.is_trace() {
            tracing::trace!(?config, "effective configuration");
        }
        Ok(config)
    }

    async fn run_queued(
        queue: &TaskQueue,
        config: Arc<ExtractionConfig>,
        request: RunRequest,
    ) -> Result<RunOutcome> {
        let handle = queue.submit(config, request)?;
        let job = handle.id;
        handle
            .follow(|event| match event {
                PipelineEvent::State(state) => tracing::debug!(job, %state, "pipeline state"),
                PipelineEvent::Progress { completed, total } => {
                    tracing::info!(job, completed, total, "sources processed")
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["domainextractor"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[tokio::test]
    async fn export_run_writes_file_and_stats() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.csv");
        let stats = dir.path().join("stats.csv");
        fs::write(&input, "alpha.com beta.org alpha.com").unwrap();

        let code = App::run(&cli(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--stats-csv",
            stats.to_str().unwrap(),
            "--no-color",
            "--verbose",
            "0",
        ]))
        .await
        .unwrap();

        assert_eq!(code, 0);
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "domain\nalpha.com\nbeta.org\n"
        );
        assert!(fs::read_to_string(&stats).unwrap().contains("duplicates_removed,1"));
    }

    #[tokio::test]
    async fn preview_flag_keeps_output_unwritten() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        fs::write(&input, "alpha.com").unwrap();

        let mut args = cli(&[input.to_str().unwrap(), "--no-color", "--verbose", "0"]);
        args.output = Some(output.clone());
        args.preview = true;

        assert_eq!(App::run(&args).await.unwrap(), 0);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn missing_input_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let code = App::run(&cli(&[
            dir.path().join("nope.txt").to_str().unwrap(),
            "--verbose",
            "0",
        ]))
        .await
        .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn invalid_configuration_exits_with_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "example.com").unwrap();
        let code = App::run(&cli(&[
            input.to_str().unwrap(),
            "--min-length",
            "20",
            "--max-length",
            "5",
            "--verbose",
            "0",
        ]))
        .await
        .unwrap();
        assert_eq!(code, 1);
    }

    #[tokio::test]
    async fn save_config_only() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("cfg.json");
        let code = App::run(&cli(&[
            "--save-config",
            saved.to_str().unwrap(),
            "--mode",
            "url",
            "--verbose",
            "0",
        ]))
        .await
        .unwrap();
        assert_eq!(code, 0);
        let loaded = ExtractionConfig::from_file(&saved).unwrap();
        assert_eq!(loaded.mode, crate::config::ExtractionMode::Url);
    }

    #[tokio::test]
    async fn check_exit_codes() {
        assert_eq!(App::run(&cli(&["--check", "Example.COM"])).await.unwrap(), 0);
        assert_eq!(App::run(&cli(&["--check", "bad_domain.com"])).await.unwrap(), 1);
    }
}
