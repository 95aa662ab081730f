//! Run statistics and the bounded history of completed exports.

use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ExportFormat;
use crate::filter::Rejection;

/// Aggregate counts of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Sources fully read and processed
    pub files_processed: usize,
    /// Raw candidates produced by the extractor
    pub total_extracted: usize,
    /// Candidates accepted by the filter
    pub valid_domains: usize,
    /// Entries collapsed by deduplication
    pub duplicates_removed: usize,
    /// Length of the final sequence (before any preview truncation)
    pub final_count: usize,
    /// Accepted candidates per last label
    pub tld_counts: BTreeMap<String, usize>,
    /// Rejected candidates per filter stage
    pub rejections: BTreeMap<String, usize>,
    /// Labels of the processed sources, in order
    pub sources: Vec<String>,
    #[serde(with = "duration_secs")]
    pub processing_time: Duration,
}

impl RunStatistics {
    pub fn record_tld(&mut self, tld: &str) {
        *self.tld_counts.entry(tld.to_string()).or_insert(0) += 1;
    }

    pub fn record_rejection(&mut self, reason: Rejection) {
        *self.rejections.entry(reason.as_str().to_string()).or_insert(0) += 1;
    }

    /// Processing time rendered like `0.42s`.
    pub fn formatted_duration(&self) -> String {
        format_duration(self.processing_time)
    }

    /// TLDs ordered by descending count, then name.
    pub fn top_tlds(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut v: Vec<_> = self
            .tld_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v.truncate(limit);
        v
    }

    /// `metric,value` rows followed by one `tld:<name>` row per TLD.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("metric,value\n");
        let _ = writeln!(out, "files_processed,{}", self.files_processed);
        let _ = writeln!(out, "total_extracted,{}", self.total_extracted);
        let _ = writeln!(out, "valid_domains,{}", self.valid_domains);
        let _ = writeln!(out, "duplicates_removed,{}", self.duplicates_removed);
        let _ = writeln!(out, "final_count,{}", self.final_count);
        let _ = writeln!(out, "processing_time,{}", self.formatted_duration());
        for (reason, count) in &self.rejections {
            let _ = writeln!(out, "rejected:{reason},{count}");
        }
        for (tld, count) in &self.tld_counts {
            let _ = writeln!(out, "tld:{tld},{count}");
        }
        out
    }
}

pub fn format_duration(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

mod duration_secs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs.max(0.0)).map_err(D::Error::custom)
    }
}

/// One completed export kept for later replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub domains: Vec<String>,
    pub statistics: RunStatistics,
    pub target: String,
    pub format: ExportFormat,
}

/// Bounded, append-only run history; the oldest entry is evicted once
/// capacity is exceeded.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(10)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            timestamp: Utc::now(),
            domains: vec![format!("d{n}.example.com")],
            statistics: RunStatistics {
                final_count: n,
                ..Default::default()
            },
            target: format!("out{n}.txt"),
            format: ExportFormat::Txt,
        }
    }

    #[test]
    fn history_evicts_oldest() {
        let mut h = History::with_capacity(3);
        for n in 0..5 {
            h.push(entry(n));
        }
        assert_eq!(h.len(), 3);
        let counts: Vec<usize> = h.iter().map(|e| e.statistics.final_count).collect();
        assert_eq!(counts, vec![2, 3, 4]);
        assert_eq!(h.latest().map(|e| e.target.as_str()), Some("out4.txt"));
    }

    #[test]
    fn default_capacity_is_ten() {
        let mut h = History::default();
        for n in 0..12 {
            h.push(entry(n));
        }
        assert_eq!(h.capacity(), 10);
        assert_eq!(h.len(), 10);
    }

    #[test]
    fn tld_tally_and_top() {
        let mut s = RunStatistics::default();
        for t in ["com", "org", "com", "net", "com", "org"] {
            s.record_tld(t);
        }
        assert_eq!(s.top_tlds(2), vec![("com", 3), ("org", 2)]);
    }

    #[test]
    fn csv_rendering() {
        let mut s = RunStatistics {
            files_processed: 2,
            total_extracted: 10,
            valid_domains: 8,
            duplicates_removed: 3,
            final_count: 5,
            processing_time: Duration::from_millis(1250),
            ..Default::default()
        };
        s.record_tld("com");
        s.record_rejection(Rejection::Blacklisted);
        let csv = s.to_csv();
        assert!(csv.starts_with("metric,value\n"));
        assert!(csv.contains("duplicates_removed,3\n"));
        assert!(csv.contains("processing_time,1.25s\n"));
        assert!(csv.contains("rejected:blacklist,1\n"));
        assert!(csv.contains("tld:com,1\n"));
    }

    #[test]
    fn statistics_serde_round_trip() {
        let s = RunStatistics {
            final_count: 1,
            processing_time: Duration::from_millis(500),
            ..Default::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"processing_time\":0.5"));
        let back: RunStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn out_of_range_processing_time_is_a_deserialize_error() {
        let mut value = serde_json::to_value(RunStatistics::default()).unwrap();
        value["processing_time"] = serde_json::json!(1e300);
        assert!(serde_json::from_value::<RunStatistics>(value).is_err());

        let mut value = serde_json::to_value(RunStatistics::default()).unwrap();
        value["processing_time"] = serde_json::json!(-2.5);
        let back: RunStatistics = serde_json::from_value(value).unwrap();
        assert_eq!(back.processing_time, Duration::ZERO);
    }
}
