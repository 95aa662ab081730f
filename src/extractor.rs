//! Candidate extraction from free text.
//!
//! Each [`ExtractionMode`] is a separate matching grammar applied to the
//! text after every strip-set character has been replaced by a space (so
//! `(example.com)` or `[a.org]` cannot glue neighbouring tokens together).
//! Output order is order of appearance; nothing is deduplicated or
//! validated here.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExtractionMode;

/// `label(.label)+` with a final alphabetic label, word-bounded.
static STANDARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63}\b").unwrap()
});

/// Looser labels (edge hyphens allowed), optional trailing `.label`.
static AGGRESSIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:[a-z0-9-]{1,63}\.)+[a-z]{2,63}(?:\.[a-z0-9-]{1,63})?").unwrap()
});

/// `local@domain`, capturing the domain.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)[a-z0-9._%+\-]+@((?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63})\b",
    )
    .unwrap()
});

/// Optional scheme and `www.`, capturing the host up to port/path/query.
/// Matches that start right after a single `/` are path segments, not hosts;
/// after `//` (any scheme, or protocol-relative) they are hosts.
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?((?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,63})(?:[:/?#]|\b)",
    )
    .unwrap()
});

/// Replace every strip-set character with a space.
pub fn preprocess(text: &str, strip_chars: &str) -> String {
    if strip_chars.is_empty() {
        return text.to_string();
    }
    text.chars()
        .map(|c| if strip_chars.contains(c) { ' ' } else { c })
        .collect()
}

/// Lower-case and trim leading/trailing dots and hyphens.
pub fn normalize_candidate(raw: &str) -> String {
    raw.to_lowercase()
        .trim_matches(|c| c == '.' || c == '-')
        .to_string()
}

/// Extract raw candidates from already preprocessed text.
pub fn extract_candidates(text: &str, mode: ExtractionMode) -> Vec<String> {
    let raw: Vec<&str> = match mode {
        ExtractionMode::Standard => STANDARD_RE
            .find_iter(text)
            .filter(|m| !touches_at_sign(text, m.start(), m.end()))
            .map(|m| m.as_str())
            .collect(),
        ExtractionMode::Aggressive => AGGRESSIVE_RE.find_iter(text).map(|m| m.as_str()).collect(),
        ExtractionMode::Email => EMAIL_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect(),
        ExtractionMode::Url => URL_RE
            .captures_iter(text)
            .filter(|c| c.get(0).is_some_and(|m| !is_path_segment(text, m.start())))
            .filter_map(|c| c.get(1))
            .filter(|m| !touches_at_sign(text, m.start(), m.end()))
            .map(|m| m.as_str())
            .collect(),
    };

    raw.into_iter()
        .map(normalize_candidate)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Preprocess with the strip set, then extract.
pub fn extract(text: &str, mode: ExtractionMode, strip_chars: &str) -> Vec<String> {
    let cleaned = preprocess(text, strip_chars);
    extract_candidates(&cleaned, mode)
}

fn is_path_segment(text: &str, start: usize) -> bool {
    let before = &text[..start];
    before.ends_with('/') && !before.ends_with("//")
}

/// Whether the match sits directly next to an `@` (part of an e-mail address).
fn touches_at_sign(text: &str, start: usize, end: usize) -> bool {
    text[..start].ends_with('@') || text[end..].starts_with('@')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_STRIP_CHARS;

    fn run(text: &str, mode: ExtractionMode) -> Vec<String> {
        extract(text, mode, DEFAULT_STRIP_CHARS)
    }

    #[test]
    fn standard_skips_email_addresses() {
        let text = "Visit example.com or test@mail.ru";
        assert_eq!(run(text, ExtractionMode::Standard), vec!["example.com"]);
        assert!(run("john.doe@corp.example.org", ExtractionMode::Standard).is_empty());
    }

    #[test]
    fn email_mode_extracts_domain_part() {
        let text = "Visit example.com or test@mail.ru";
        assert_eq!(run(text, ExtractionMode::Email), vec!["mail.ru"]);
        assert_eq!(
            run("<Admin@Sub.Example.ORG>, b.c@x.io", ExtractionMode::Email),
            vec!["sub.example.org", "x.io"]
        );
    }

    #[test]
    fn standard_lowercases_and_keeps_order() {
        let text = "b.example.COM then A.example.net then b.example.com";
        assert_eq!(
            run(text, ExtractionMode::Standard),
            vec!["b.example.com", "a.example.net", "b.example.com"]
        );
    }

    #[test]
    fn standard_requires_alphabetic_tld() {
        assert!(run("version 1.2.3 and 10.0.0.1", ExtractionMode::Standard).is_empty());
    }

    #[test]
    fn strip_set_splits_bracketed_tokens() {
        assert_eq!(
            run("[host.example.com](other.org)", ExtractionMode::Standard),
            vec!["host.example.com", "other.org"]
        );
        assert_eq!(preprocess("a(b)c", "()"), "a b c");
        assert_eq!(preprocess("a(b)c", ""), "a(b)c");
    }

    #[test]
    fn trailing_dots_are_trimmed() {
        assert_eq!(
            run("resolved example.org. today", ExtractionMode::Standard),
            vec!["example.org"]
        );
    }

    #[test]
    fn aggressive_tolerates_hyphens_and_compound_suffix() {
        let found = run("x-bad-.example.co.uk_tail", ExtractionMode::Aggressive);
        assert_eq!(found, vec!["x-bad-.example.co.uk"]);

        let found = run("-edge.example.com", ExtractionMode::Aggressive);
        assert_eq!(found, vec!["edge.example.com"]);
    }

    #[test]
    fn url_mode_captures_host() {
        let text = "GET https://www.Example.com:8443/path?q=1 and http://cdn.site.io/x.js";
        assert_eq!(
            run(text, ExtractionMode::Url),
            vec!["example.com", "cdn.site.io"]
        );
    }

    #[test]
    fn url_mode_keeps_hosts_after_other_schemes() {
        let text = "ftp://files.example.com/pub and //cdn.example.net/lib.js";
        assert_eq!(
            run(text, ExtractionMode::Url),
            vec!["files.example.com", "cdn.example.net"]
        );
    }

    #[test]
    fn url_mode_accepts_bare_hosts() {
        assert_eq!(
            run("see docs.rs/regex for details", ExtractionMode::Url),
            vec!["docs.rs"]
        );
    }

    #[test]
    fn normalize_candidate_trims_edges() {
        assert_eq!(normalize_candidate("-.Example.COM.-"), "example.com");
        assert_eq!(normalize_candidate("..."), "");
    }
}
