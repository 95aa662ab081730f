//! Wildcard patterns for blacklist / whitelist matching.
//!
//! A pattern is a literal string in which `*` stands for any run of
//! characters, including an empty one. Matching is case-insensitive and
//! anchored at both ends: `*.spam.com` matches `a.spam.com` but neither
//! `spam.com` nor `a.spam.com.evil`.

use thiserror::Error;

/// Reasons a pattern cannot be compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("wildcard pattern is empty")]
    Empty,
    #[error("wildcard pattern {pattern:?} contains whitespace or control characters")]
    InvalidCharacter { pattern: String },
}

/// A compiled wildcard pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    source: String,
    /// Literal pieces between `*`s, lower-cased. `pieces.len() == stars + 1`.
    pieces: Vec<String>,
}

impl WildcardPattern {
    /// Compile a pattern such as `*.example.*`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(PatternError::Empty);
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PatternError::InvalidCharacter {
                pattern: pattern.to_string(),
            });
        }
        let lowered = trimmed.to_lowercase();
        Ok(Self {
            source: trimmed.to_string(),
            pieces: lowered.split('*').map(str::to_string).collect(),
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the whole of `candidate` matches.
    pub fn is_match(&self, candidate: &str) -> bool {
        let lowered = candidate.to_lowercase();
        let text = lowered.as_str();

        let (first, rest) = match self.pieces.split_first() {
            Some(split) => split,
            None => return false,
        };
        if rest.is_empty() {
            return text == first;
        }

        let Some(mut remaining) = text.strip_prefix(first.as_str()) else {
            return false;
        };
        let (last, middle) = match rest.split_last() {
            Some(split) => split,
            None => return false,
        };

        for piece in middle {
            match remaining.find(piece.as_str()) {
                Some(idx) => remaining = &remaining[idx + piece.len()..],
                None => return false,
            }
        }
        remaining.ends_with(last.as_str())
    }
}

/// One-shot convenience; malformed patterns never match.
pub fn matches(domain: &str, pattern: &str) -> bool {
    WildcardPattern::compile(pattern)
        .map(|p| p.is_match(domain))
        .unwrap_or(false)
}

/// An ordered set of compiled patterns.
///
/// Malformed entries still count as members of the set but never match, so
/// a whitelist made only of malformed entries rejects everything.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<WildcardPattern>,
    configured: usize,
}

impl PatternSet {
    pub fn compile<S: AsRef<str>>(patterns: &[S], list_name: &str) -> Self {
        let compiled = patterns
            .iter()
            .filter_map(|p| match WildcardPattern::compile(p.as_ref()) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    tracing::warn!(list = list_name, "{list_name} entry will never match: {e}");
                    None
                }
            })
            .collect();
        Self {
            patterns: compiled,
            configured: patterns.len(),
        }
    }

    /// Whether no entries were configured at all.
    pub fn is_empty(&self) -> bool {
        self.configured == 0
    }

    /// Number of entries that compiled.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// First pattern matching the candidate.
    pub fn find_match(&self, candidate: &str) -> Option<&WildcardPattern> {
        self.patterns.iter().find(|p| p.is_match(candidate))
    }

    pub fn any_match(&self, candidate: &str) -> bool {
        self.find_match(candidate).is_some()
    }
}
