//! Accept/reject decision for extracted candidates.
//!
//! Checks run in a fixed order and stop at the first rejection:
//! length bounds, presence of a dot, structural validity (when enabled),
//! TLD allow-set, blacklist, whitelist.

use std::collections::HashSet;

use crate::config::{ExtractionConfig, normalize_tld};
use crate::domain_utils::{self, last_two_labels, tld_of};
use crate::pattern::PatternSet;

/// Filter stage that rejected a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rejection {
    Length,
    NoDot,
    Structure,
    Tld,
    Blacklisted,
    NotWhitelisted,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Length => "length",
            Rejection::NoDot => "no_dot",
            Rejection::Structure => "structure",
            Rejection::Tld => "tld",
            Rejection::Blacklisted => "blacklist",
            Rejection::NotWhitelisted => "whitelist",
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter compiled from a config: patterns and TLD set are prepared once
/// and reused for every candidate of a run.
#[derive(Debug, Clone)]
pub struct DomainFilter {
    min_length: usize,
    max_length: usize,
    validate_structure: bool,
    tlds: HashSet<String>,
    blacklist: PatternSet,
    whitelist: PatternSet,
}

impl DomainFilter {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self {
            min_length: config.min_length,
            max_length: config.max_length,
            validate_structure: config.validate_structure,
            tlds: config.tlds.iter().filter_map(|t| normalize_tld(t)).collect(),
            blacklist: PatternSet::compile(&config.blacklist, "blacklist"),
            whitelist: PatternSet::compile(&config.whitelist, "whitelist"),
        }
    }

    /// Run every check, returning the stage that rejected the candidate.
    pub fn evaluate(&self, candidate: &str) -> Result<(), Rejection> {
        let len = candidate.chars().count();
        if len < self.min_length || len > self.max_length {
            return Err(Rejection::Length);
        }

        if !candidate.contains('.') {
            return Err(Rejection::NoDot);
        }

        if self.validate_structure && !domain_utils::is_valid(candidate) {
            return Err(Rejection::Structure);
        }

        if !self.tlds.is_empty() {
            let last = tld_of(candidate);
            let allowed = self.tlds.contains(last)
                || last_two_labels(candidate).is_some_and(|two| self.tlds.contains(two));
            if !allowed {
                return Err(Rejection::Tld);
            }
        }

        if let Some(pattern) = self.blacklist.find_match(candidate) {
            tracing::trace!(candidate, pattern = pattern.as_str(), "blacklisted");
            return Err(Rejection::Blacklisted);
        }

        if !self.whitelist.is_empty() && !self.whitelist.any_match(candidate) {
            return Err(Rejection::NotWhitelisted);
        }

        Ok(())
    }

    pub fn accept(&self, candidate: &str) -> bool {
        self.evaluate(candidate).is_ok()
    }
}

/// One-shot predicate; compiles the config's patterns on every call.
pub fn accept(candidate: &str, config: &ExtractionConfig) -> bool {
    DomainFilter::new(config).accept(candidate)
}
