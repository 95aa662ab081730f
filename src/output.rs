//! Export encodings for the final domain sequence.
//!
//! Every encoding is an [`DomainExporter`] trait object so callers can pick
//! one at runtime (`create_exporter`) and either render to a string or
//! write straight to a target file (`export`).

use std::fs;
use std::io;
use std::path::Path;

use crate::config::{ExportFormat, ExtractionConfig};
use crate::errors::{ExtractorError, Result};
use crate::stats::RunStatistics;
use crate::structured_output::ExportDocument;

/// Exporter trait - dyn-compatible, no generic methods
pub trait DomainExporter {
    /// Render the domains (and, where the encoding carries them, the statistics)
    fn render(&self, domains: &[String], statistics: &RunStatistics) -> io::Result<String>;

    /// Get the MIME type for this format
    fn mime_type(&self) -> &'static str;

    /// Get the file extension for this format
    fn file_extension(&self) -> &'static str;
}

/// Plain text joined by a separator
pub struct TxtExporter {
    separator: String,
}

impl TxtExporter {
    /// `separator` must already have its `\n` / `\t` escapes resolved.
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl DomainExporter for TxtExporter {
    fn render(&self, domains: &[String], _statistics: &RunStatistics) -> io::Result<String> {
        Ok(domains.join(&self.separator))
    }

    fn mime_type(&self) -> &'static str {
        "text/plain"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

/// Single-column CSV with a `domain` header
pub struct CsvExporter;

impl DomainExporter for CsvExporter {
    fn render(&self, domains: &[String], _statistics: &RunStatistics) -> io::Result<String> {
        let mut output = String::from("domain\n");
        for domain in domains {
            output.push_str(&csv_field(domain));
            output.push('\n');
        }
        Ok(output)
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }
}

/// JSON document with domains, count, timestamp and statistics
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl DomainExporter for JsonExporter {
    fn render(&self, domains: &[String], statistics: &RunStatistics) -> io::Result<String> {
        let document = ExportDocument::new(domains, statistics);

        let json_string = if self.pretty {
            serde_json::to_string_pretty(&document).map_err(io::Error::other)?
        } else {
            serde_json::to_string(&document).map_err(io::Error::other)?
        };

        Ok(format!("{}\n", json_string))
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}

/// `<domains>` root with one `<domain>` child per entry
pub struct XmlExporter;

impl DomainExporter for XmlExporter {
    fn render(&self, domains: &[String], _statistics: &RunStatistics) -> io::Result<String> {
        let mut output = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<domains>\n");
        for domain in domains {
            output.push_str("  <domain>");
            output.push_str(&xml_text(domain));
            output.push_str("</domain>\n");
        }
        output.push_str("</domains>\n");
        Ok(output)
    }

    fn mime_type(&self) -> &'static str {
        "application/xml"
    }

    fn file_extension(&self) -> &'static str {
        "xml"
    }
}

/// Quote a CSV field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Escape markup characters. Validated domains never contain any, but
/// prefixes and templates may.
fn xml_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Create an exporter for the format
pub fn create_exporter(format: ExportFormat, config: &ExtractionConfig) -> Box<dyn DomainExporter> {
    match format {
        ExportFormat::Txt => Box::new(TxtExporter::new(config.resolved_separator())),
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Json => Box::new(JsonExporter::new(true)),
        ExportFormat::Xml => Box::new(XmlExporter),
    }
}

/// Render and write the domains to `target`.
pub fn export(
    domains: &[String],
    target: &Path,
    format: ExportFormat,
    config: &ExtractionConfig,
    statistics: &RunStatistics,
) -> Result<()> {
    let exporter = create_exporter(format, config);
    let rendered = exporter
        .render(domains, statistics)
        .map_err(|e| ExtractorError::render(format.to_string(), e.to_string()))?;

    fs::write(target, rendered).map_err(|e| {
        ExtractorError::export(
            target.display().to_string(),
            domains.len(),
            statistics.clone(),
            e,
        )
    })?;

    tracing::info!(
        target = %target.display(),
        format = %format,
        mime = exporter.mime_type(),
        count = domains.len(),
        "exported domains"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn domains() -> Vec<String> {
        vec!["example.com".to_string(), "mail.example.org".to_string()]
    }

    fn stats() -> RunStatistics {
        RunStatistics {
            files_processed: 1,
            total_extracted: 4,
            valid_domains: 3,
            duplicates_removed: 1,
            final_count: 2,
            processing_time: Duration::from_millis(420),
            ..Default::default()
        }
    }

    #[test]
    fn test_txt_exporter_resolves_escapes() {
        let mut config = ExtractionConfig::default();
        config.separator = ",\\t".to_string();
        let text = create_exporter(ExportFormat::Txt, &config)
            .render(&domains(), &stats())
            .unwrap();
        assert_eq!(text, "example.com,\tmail.example.org");
    }

    #[test]
    fn test_txt_default_newline() {
        let config = ExtractionConfig::default();
        let text = create_exporter(ExportFormat::Txt, &config)
            .render(&domains(), &stats())
            .unwrap();
        assert_eq!(text, "example.com\nmail.example.org");
    }

    #[test]
    fn test_csv_exporter() {
        let mut d = domains();
        d.push("a,b \"x\"".to_string());
        let text = CsvExporter.render(&d, &stats()).unwrap();
        let lines: Vec<&str> = text.trim_end().split('\n').collect();
        assert_eq!(lines.len(), 4); // header + 3 rows
        assert_eq!(lines[0], "domain");
        assert_eq!(lines[1], "example.com");
        assert_eq!(lines[3], "\"a,b \"\"x\"\"\"");
    }

    #[test]
    fn test_json_exporter() {
        let text = JsonExporter::new(false).render(&domains(), &stats()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["count"], 2);
        assert_eq!(v["domains"][1], "mail.example.org");
        assert_eq!(v["statistics"]["files_processed"], 1);
        assert_eq!(v["statistics"]["total_extracted"], 4);
        assert_eq!(v["statistics"]["duplicates_removed"], 1);
        assert_eq!(v["statistics"]["processing_time"], "0.42s");
        assert!(v["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_xml_exporter() {
        let text = XmlExporter.render(&domains(), &stats()).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("<domains>\n  <domain>example.com</domain>\n"));
        assert!(text.trim_end().ends_with("</domains>"));
        assert_eq!(xml_text("<a&b>"), "&lt;a&amp;b&gt;");
    }

    #[test]
    fn test_empty_xml() {
        let text = XmlExporter.render(&[], &stats()).unwrap();
        assert!(text.contains("<domains>\n</domains>"));
    }

    #[test]
    fn test_mime_and_extension() {
        let config = ExtractionConfig::default();
        for (format, ext) in [
            (ExportFormat::Txt, "txt"),
            (ExportFormat::Csv, "csv"),
            (ExportFormat::Json, "json"),
            (ExportFormat::Xml, "xml"),
        ] {
            assert_eq!(create_exporter(format, &config).file_extension(), ext);
        }
        assert_eq!(XmlExporter.mime_type(), "application/xml");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.csv");
        let config = ExtractionConfig::default();
        export(&domains(), &target, ExportFormat::Csv, &config, &stats()).unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert_eq!(written, "domain\nexample.com\nmail.example.org\n");
    }

    #[test]
    fn test_export_unwritable_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing-dir").join("out.txt");
        let config = ExtractionConfig::default();
        let err = export(&domains(), &target, ExportFormat::Txt, &config, &stats()).unwrap_err();
        assert!(matches!(err, ExtractorError::Export { count: 2, .. }));
        assert_eq!(err.statistics().map(|s| s.final_count), Some(2));
    }
}
