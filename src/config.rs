//! Configuration management for domainextractor.
//!
//! [`ExtractionConfig`] is the single record every pipeline stage reads.
//! It can be loaded from a JSON file, overridden from environment variables
//! and finally from command-line arguments (CLI takes precedence). No stage
//! mutates it during a run.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::formatter;
use crate::sources::TextEncoding;

/// Matching grammar used to locate candidates in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Word-bounded `label(.label)+` tokens
    #[default]
    Standard,
    /// Looser labels, optional compound suffix, no word boundary
    Aggressive,
    /// Domain part of `local@domain` addresses
    Email,
    /// Host part of http(s) URLs
    Url,
}

/// Case transform applied to each domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    #[default]
    Lower,
    Upper,
    /// Leaves the value untouched. Candidates are lower-cased at extraction,
    /// so the casing found in the source text is not recoverable.
    Original,
}

/// Structural slice applied to each domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DomainFormat {
    #[default]
    Full,
    #[value(name = "no_tld")]
    NoTld,
    #[value(name = "only_tld")]
    OnlyTld,
    Sld,
}

/// Encoding of the exported result file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Txt,
    Csv,
    Json,
    Xml,
}

impl ExportFormat {
    /// Guess the format from an output file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "text" | "lst" => Some(ExportFormat::Txt),
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "xml" => Some(ExportFormat::Xml),
            _ => None,
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
        };
        f.write_str(s)
    }
}

/// Default characters replaced by spaces before extraction.
pub const DEFAULT_STRIP_CHARS: &str = "()[]{}<>\"'`,;|";

/// Main configuration structure for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidate matching grammar
    pub mode: ExtractionMode,

    /// Characters replaced with a space before matching
    pub strip_chars: String,

    /// Inclusive length bounds of an accepted candidate
    pub min_length: usize,
    pub max_length: usize,

    pub case_mode: CaseMode,
    pub domain_format: DomainFormat,

    /// Strip a leading `www.` label
    pub remove_www: bool,

    /// Enforce RFC-style label rules on candidates
    pub validate_structure: bool,

    /// Allowed suffixes (empty = unrestricted). Lower-cased, no leading dot.
    pub tlds: BTreeSet<String>,

    /// Wildcard patterns rejecting a candidate
    pub blacklist: Vec<String>,

    /// Wildcard patterns a candidate must match when non-empty
    pub whitelist: Vec<String>,

    /// Render through `template` instead of prefix/suffix
    pub advanced_mask: bool,
    pub template: String,

    pub prefix: String,
    pub suffix: String,

    /// Separator for txt export; `\n` and `\t` escapes are honoured
    pub separator: String,

    pub sort: bool,
    pub dedupe: bool,
    pub export_format: ExportFormat,

    /// Number of domains kept by a preview run
    pub preview_limit: usize,

    /// Number of completed exports kept in the run history
    pub history_capacity: usize,

    /// Decoding used when a source carries no BOM and is not valid UTF-8
    pub default_encoding: TextEncoding,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Standard,
            strip_chars: DEFAULT_STRIP_CHARS.to_string(),
            min_length: 4,
            max_length: 253,
            case_mode: CaseMode::Lower,
            domain_format: DomainFormat::Full,
            remove_www: true,
            validate_structure: true,
            tlds: BTreeSet::new(),
            blacklist: vec![],
            whitelist: vec![],
            advanced_mask: false,
            template: "{domain}".to_string(),
            prefix: String::new(),
            suffix: String::new(),
            separator: "\\n".to_string(),
            sort: false,
            dedupe: true,
            export_format: ExportFormat::Txt,
            preview_limit: 100,
            history_capacity: 10,
            default_encoding: TextEncoding::Utf8,
        }
    }
}

impl ExtractionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|e| ConfigError::FileRead {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON document. Missing keys take defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            format: "JSON".to_string(),
            reason: e.to_string(),
        })?;
        config.normalize();
        Ok(config)
    }

    /// Serialize to a pretty JSON document
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            format: "JSON".to_string(),
            reason: e.to_string(),
        })
    }

    /// Save configuration as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        fs::write(&path, json).map_err(|e| ConfigError::FileWrite {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `DOMAINEXTRACTOR_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(mode) = std::env::var("DOMAINEXTRACTOR_MODE")
            && let Ok(m) = ExtractionMode::from_str(&mode, true)
        {
            self.mode = m;
        }

        if let Ok(min) = std::env::var("DOMAINEXTRACTOR_MIN_LENGTH")
            && let Ok(n) = min.parse::<usize>()
        {
            self.min_length = n;
        }

        if let Ok(max) = std::env::var("DOMAINEXTRACTOR_MAX_LENGTH")
            && let Ok(n) = max.parse::<usize>()
        {
            self.max_length = n;
        }

        if let Ok(sort) = std::env::var("DOMAINEXTRACTOR_SORT") {
            self.sort = sort.eq_ignore_ascii_case("true")
                || sort.eq_ignore_ascii_case("1")
                || sort.eq_ignore_ascii_case("yes");
        }

        if let Ok(limit) = std::env::var("DOMAINEXTRACTOR_PREVIEW_LIMIT")
            && let Ok(n) = limit.parse::<usize>()
        {
            self.preview_limit = n;
        }
    }

    /// Merge with CLI arguments, giving CLI precedence
    pub fn merge_with_cli(&mut self, cli: &crate::cli::Cli) {
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(case) = cli.case {
            self.case_mode = case;
        }
        if let Some(format) = cli.domain_format {
            self.domain_format = format;
        }

        if let Some(format) = cli.export_format {
            self.export_format = format;
        } else if let Some(ref out) = cli.output
            && let Some(format) = ExportFormat::from_path(out)
        {
            self.export_format = format;
        }

        if let Some(ref chars) = cli.strip_chars {
            self.strip_chars = chars.clone();
        }
        if let Some(min) = cli.min_length {
            self.min_length = min;
        }
        if let Some(max) = cli.max_length {
            self.max_length = max;
        }

        if !cli.tlds.is_empty() {
            self.tlds = cli.tlds.iter().cloned().collect();
        }
        if !cli.blacklist.is_empty() {
            self.blacklist = cli.blacklist.clone();
        }
        if !cli.whitelist.is_empty() {
            self.whitelist = cli.whitelist.clone();
        }

        if let Some(ref template) = cli.template {
            self.template = template.clone();
            self.advanced_mask = true;
        }
        if let Some(ref prefix) = cli.prefix {
            self.prefix = prefix.clone();
        }
        if let Some(ref suffix) = cli.suffix {
            self.suffix = suffix.clone();
        }
        if let Some(ref separator) = cli.separator {
            self.separator = separator.clone();
        }
        if let Some(limit) = cli.preview_limit {
            self.preview_limit = limit;
        }

        if cli.sort {
            self.sort = true;
        }
        if cli.no_dedupe {
            self.dedupe = false;
        }
        if cli.keep_www {
            self.remove_www = false;
        }
        if cli.no_validate {
            self.validate_structure = false;
        }

        self.normalize();
    }

    /// Re-establish the TLD invariant (lower-case, no leading dot, no blanks).
    pub fn normalize(&mut self) {
        self.tlds = std::mem::take(&mut self.tlds)
            .into_iter()
            .filter_map(|t| normalize_tld(&t))
            .collect();
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_length > self.max_length {
            return Err(ConfigError::InvalidValue {
                field: "min_length".to_string(),
                value: self.min_length.to_string(),
                reason: format!("must not exceed max_length ({})", self.max_length),
            });
        }

        if self.preview_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "preview_limit".to_string(),
                value: "0".to_string(),
                reason: "Preview limit must be at least 1".to_string(),
            });
        }

        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history_capacity".to_string(),
                value: "0".to_string(),
                reason: "History capacity must be at least 1".to_string(),
            });
        }

        if self.advanced_mask && self.template.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "template".to_string(),
            });
        }

        if self.advanced_mask && !formatter::has_placeholder(&self.template) {
            tracing::warn!(
                template = %self.template,
                "template has no placeholders, every domain renders the same"
            );
        }

        Ok(())
    }

    /// Separator with the user-typed `\n` / `\t` escapes turned into real characters.
    pub fn resolved_separator(&self) -> String {
        self.separator.replace("\\n", "\n").replace("\\t", "\t")
    }
}

/// Lower-case a TLD entry and drop leading dots; `None` for blank entries.
pub fn normalize_tld(raw: &str) -> Option<String> {
    let t = raw.trim().trim_start_matches('.').to_ascii_lowercase();
    if t.is_empty() { None } else { Some(t) }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// Failed to write configuration file
    FileWrite {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse configuration format
    Parse { format: String, reason: String },

    /// Invalid configuration value
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Missing required configuration
    MissingRequired { field: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileRead { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path, source)
            }
            ConfigError::FileWrite { path, source } => {
                write!(f, "Failed to write config file '{}': {}", path, source)
            }
            ConfigError::Parse { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for '{}': {}", value, field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required configuration field: {}", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileRead { source, .. } | ConfigError::FileWrite { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.mode, ExtractionMode::Standard);
        assert_eq!(config.min_length, 4);
        assert_eq!(config.max_length, 253);
        assert!(config.remove_www);
        assert!(config.dedupe);
        assert!(!config.sort);
        assert_eq!(config.preview_limit, 100);
        assert_eq!(config.history_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ExtractionConfig::default();
        config.min_length = 10;
        config.max_length = 5;
        assert!(config.validate().is_err());

        config.max_length = 10;
        assert!(config.validate().is_ok());

        config.preview_limit = 0;
        assert!(config.validate().is_err());

        config.preview_limit = 5;
        config.advanced_mask = true;
        config.template.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { .. })
        ));
    }

    #[test]
    fn test_json_partial_document_uses_defaults() {
        let config = ExtractionConfig::from_json(
            r#"{"mode": "email", "tlds": [".COM", "co.uk", "  "], "domain_format": "no_tld"}"#,
        )
        .unwrap();
        assert_eq!(config.mode, ExtractionMode::Email);
        assert_eq!(config.domain_format, DomainFormat::NoTld);
        assert_eq!(
            config.tlds.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["co.uk", "com"]
        );
        assert_eq!(config.max_length, 253);
    }

    #[test]
    fn test_json_parse_error() {
        let err = ExtractionConfig::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON config"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ExtractionConfig::default();
        config.blacklist = vec!["*.spam.com".to_string()];
        config.export_format = ExportFormat::Xml;
        config.save(&path).unwrap();

        let loaded = ExtractionConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = ExtractionConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn test_env_loading() {
        unsafe {
            env::set_var("DOMAINEXTRACTOR_MODE", "url");
            env::set_var("DOMAINEXTRACTOR_MIN_LENGTH", "6");
            env::set_var("DOMAINEXTRACTOR_SORT", "yes");
        }

        let config = ExtractionConfig::from_env();
        assert_eq!(config.mode, ExtractionMode::Url);
        assert_eq!(config.min_length, 6);
        assert!(config.sort);

        // Clean up
        unsafe {
            env::remove_var("DOMAINEXTRACTOR_MODE");
            env::remove_var("DOMAINEXTRACTOR_MIN_LENGTH");
            env::remove_var("DOMAINEXTRACTOR_SORT");
        }
    }

    #[test]
    fn test_cli_overrides() {
        use clap::Parser;
        let cli = crate::cli::Cli::parse_from([
            "domainextractor",
            "in.log",
            "--output",
            "out.XML",
            "--tld",
            ".COM",
            "--template",
            "{name}",
            "--keep-www",
            "--no-dedupe",
            "--min-length",
            "2",
        ]);
        let mut config = ExtractionConfig::default();
        config.sort = true;
        config.merge_with_cli(&cli);

        assert_eq!(config.export_format, ExportFormat::Xml);
        assert!(config.tlds.contains("com"));
        assert!(config.advanced_mask);
        assert_eq!(config.template, "{name}");
        assert!(!config.remove_www);
        assert!(!config.dedupe);
        assert!(config.sort);
        assert_eq!(config.min_length, 2);
    }

    #[test]
    fn test_resolved_separator() {
        let mut config = ExtractionConfig::default();
        assert_eq!(config.resolved_separator(), "\n");
        config.separator = ",\\t".to_string();
        assert_eq!(config.resolved_separator(), ",\t");
    }

    #[test]
    fn test_export_format_from_path() {
        assert_eq!(ExportFormat::from_path("out.CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_path("a/b.json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_path("noext"), None);
    }

    #[test]
    fn test_normalize_tld() {
        assert_eq!(normalize_tld("..Co.UK"), Some("co.uk".to_string()));
        assert_eq!(normalize_tld("   "), None);
    }
}
