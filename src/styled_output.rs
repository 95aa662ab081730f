//! Styled terminal output for run results using anstyle.
//!
//! Renders previews, export summaries, statistics and the run history for
//! humans. Machine-readable output goes through [`crate::output`] instead.

use anstyle::{AnsiColor, Color, Style};
use std::fmt::Write;
use std::io::{self, IsTerminal, Write as IoWrite};

use crate::domain_utils::DomainViolation;
use crate::pipeline::RunOutcome;
use crate::stats::{HistoryEntry, RunStatistics};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Style definitions for different UI elements
pub struct Styles {
    pub header: Style,
    pub subheader: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub muted: Style,
    pub bold: Style,
    pub domain: Style,
    pub path: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            header: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            subheader: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
            success: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            warning: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            error: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
            info: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            bold: Style::new().bold(),
            domain: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            path: Style::new()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue)))
                .underline(),
        }
    }
}

/// Styled formatter for pipeline results
pub struct StyledFormatter {
    styles: Styles,
    use_colors: bool,
}

impl StyledFormatter {
    pub fn new() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: Self::should_use_colors(),
        }
    }

    /// Create a formatter without colors (for non-interactive use)
    pub fn without_colors() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: false,
        }
    }

    /// Colors only on a terminal, and never when `NO_COLOR` is set
    fn should_use_colors() -> bool {
        io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
    }

    fn styled(&self, text: &str, style: &Style) -> String {
        if self.use_colors {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    fn write_rule(&self, output: &mut String) -> Result<(), std::fmt::Error> {
        writeln!(output, "{}", self.styled(RULE, &self.styles.muted))
    }

    /// Render any run outcome.
    pub fn format_outcome(&self, outcome: &RunOutcome) -> Result<String, std::fmt::Error> {
        let mut output = String::new();
        match outcome {
            RunOutcome::Preview {
                domains,
                total,
                statistics,
            } => {
                self.write_preview(&mut output, domains, *total)?;
                self.write_statistics(&mut output, statistics)?;
            }
            RunOutcome::Exported {
                domains,
                target,
                format,
                statistics,
            } => {
                writeln!(output)?;
                writeln!(
                    output,
                    "  {} Exported {} domain(s) as {} to {}",
                    self.styled("✓", &self.styles.success),
                    self.styled(&domains.len().to_string(), &self.styles.bold),
                    self.styled(&format.to_string(), &self.styles.info),
                    self.styled(&target.display().to_string(), &self.styles.path)
                )?;
                self.write_statistics(&mut output, statistics)?;
            }
            RunOutcome::NoResults { statistics } => {
                writeln!(output)?;
                writeln!(
                    output,
                    "  {} {}",
                    self.styled("⚠️", &self.styles.warning),
                    self.styled("No domains matched the current filters", &self.styles.warning)
                )?;
                self.write_statistics(&mut output, statistics)?;
            }
        }
        Ok(output)
    }

    fn write_preview(
        &self,
        output: &mut String,
        domains: &[String],
        total: usize,
    ) -> Result<(), std::fmt::Error> {
        writeln!(output)?;
        self.write_rule(output)?;
        let title = if domains.len() < total {
            format!("Preview: first {} of {} domain(s)", domains.len(), total)
        } else {
            format!("Preview: {} domain(s)", total)
        };
        writeln!(output, "  {}", self.styled(&title, &self.styles.header))?;
        self.write_rule(output)?;
        writeln!(output)?;

        let width = domains.len().to_string().len();
        for (i, domain) in domains.iter().enumerate() {
            writeln!(
                output,
                "  {} {}",
                self.styled(&format!("{:>width$}.", i + 1), &self.styles.muted),
                self.styled(domain, &self.styles.domain)
            )?;
        }
        Ok(())
    }

    fn write_statistics(
        &self,
        output: &mut String,
        stats: &RunStatistics,
    ) -> Result<(), std::fmt::Error> {
        writeln!(output)?;
        writeln!(
            output,
            "  {}",
            self.styled("📊 Statistics", &self.styles.subheader)
        )?;

        let rows = [
            ("Sources processed", stats.files_processed.to_string()),
            ("Candidates extracted", stats.total_extracted.to_string()),
            ("Accepted by filters", stats.valid_domains.to_string()),
            ("Duplicates removed", stats.duplicates_removed.to_string()),
            ("Final count", stats.final_count.to_string()),
            ("Processing time", stats.formatted_duration()),
        ];
        for (label, value) in rows {
            writeln!(
                output,
                "    {} {}: {}",
                self.styled("├─", &self.styles.muted),
                label,
                self.styled(&value, &self.styles.bold)
            )?;
        }

        if !stats.rejections.is_empty() {
            let rejected = stats
                .rejections
                .iter()
                .map(|(reason, n)| format!("{reason} {n}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                output,
                "    {} Rejected: {}",
                self.styled("├─", &self.styles.muted),
                self.styled(&rejected, &self.styles.muted)
            )?;
        }

        let top = stats
            .top_tlds(5)
            .into_iter()
            .map(|(tld, n)| format!(".{tld} {n}"))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(
            output,
            "    {} Top TLDs: {}",
            self.styled("└─", &self.styles.muted),
            if top.is_empty() {
                self.styled("none", &self.styles.muted)
            } else {
                self.styled(&top, &self.styles.info)
            }
        )?;
        Ok(())
    }

    /// Most recent export first.
    pub fn format_history(&self, entries: &[HistoryEntry]) -> Result<String, std::fmt::Error> {
        let mut output = String::new();
        writeln!(output)?;
        writeln!(
            output,
            "  {}",
            self.styled("🕘 Export History", &self.styles.subheader)
        )?;
        if entries.is_empty() {
            writeln!(
                output,
                "    {}",
                self.styled("No exports recorded", &self.styles.muted)
            )?;
            return Ok(output);
        }
        for entry in entries.iter().rev() {
            writeln!(
                output,
                "    {} {} {} domain(s) → {} ({})",
                self.styled("•", &self.styles.info),
                self.styled(
                    &entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    &self.styles.muted
                ),
                self.styled(&entry.domains.len().to_string(), &self.styles.bold),
                self.styled(&entry.target, &self.styles.path),
                entry.format
            )?;
        }
        Ok(output)
    }

    /// One line verdict for a single domain check.
    pub fn format_check(&self, domain: &str, verdict: &Result<(), DomainViolation>) -> String {
        match verdict {
            Ok(()) => format!(
                "{} {} is a valid domain",
                self.styled("✓", &self.styles.success),
                self.styled(domain, &self.styles.domain)
            ),
            Err(violation) => format!(
                "{} {} is not a valid domain: {}",
                self.styled("✗", &self.styles.error),
                self.styled(domain, &self.styles.bold),
                violation
            ),
        }
    }

    /// Print an outcome to stdout
    pub fn print_outcome(&self, outcome: &RunOutcome) -> io::Result<()> {
        let formatted = self.format_outcome(outcome).map_err(io::Error::other)?;
        print!("{}", formatted);
        io::stdout().flush()?;
        Ok(())
    }

    pub fn print_history(&self, entries: &[HistoryEntry]) -> io::Result<()> {
        let formatted = self.format_history(entries).map_err(io::Error::other)?;
        print!("{}", formatted);
        io::stdout().flush()?;
        Ok(())
    }
}

impl Default for StyledFormatter {
    fn default() -> Self {
        Self::new()
    }
}
