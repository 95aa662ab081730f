//! Structured (JSON) export document.
//!
//! Defines the serde/schemars model written by the `json` export format so
//! that downstream consumers can validate it against a published schema
//! (`--generate-schema`).

use anyhow::Result;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::stats::RunStatistics;

/// Root of a JSON export
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ExportDocument {
    /// Final domain sequence, in output order
    pub domains: Vec<String>,

    /// Number of entries in `domains`
    pub count: usize,

    /// When the export was produced (RFC 3339, UTC)
    pub timestamp: String,

    /// Summary of the run that produced the domains
    pub statistics: ExportStatistics,
}

/// Statistics block of a JSON export
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ExportStatistics {
    pub files_processed: usize,

    /// Raw candidates found before filtering
    pub total_extracted: usize,

    pub duplicates_removed: usize,

    /// Wall-clock duration, e.g. `0.42s`
    pub processing_time: String,
}

impl From<&RunStatistics> for ExportStatistics {
    fn from(stats: &RunStatistics) -> Self {
        Self {
            files_processed: stats.files_processed,
            total_extracted: stats.total_extracted,
            duplicates_removed: stats.duplicates_removed,
            processing_time: stats.formatted_duration(),
        }
    }
}

impl ExportDocument {
    pub fn new(domains: &[String], statistics: &RunStatistics) -> Self {
        Self {
            domains: domains.to_vec(),
            count: domains.len(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            statistics: ExportStatistics::from(statistics),
        }
    }

    /// Generate JSON schema for the export document
    pub fn generate_json_schema() -> Result<String> {
        let schema = schemars::schema_for!(ExportDocument);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
