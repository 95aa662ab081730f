//! Domain structure helpers.
//!
//! Structural validation of a candidate (RFC-style label and length rules)
//! and simple label slicing. There is no public suffix list here: the
//! "TLD" is always the last label and the "SLD" the one before it, so
//! `example.co.uk` has SLD `co`.

/// Maximum length of a full domain name.
pub const MAX_DOMAIN_LEN: usize = 253;

/// Maximum length of a single label.
pub const MAX_LABEL_LEN: usize = 63;

/// First structural rule a candidate breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainViolation {
    Empty,
    TooLong(usize),
    InvalidCharacter(char),
    TooFewLabels,
    EmptyLabel,
    LabelTooLong(String),
    HyphenEdge(String),
}

impl std::fmt::Display for DomainViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainViolation::Empty => write!(f, "domain is empty"),
            DomainViolation::TooLong(len) => {
                write!(f, "domain is {len} characters long (max {MAX_DOMAIN_LEN})")
            }
            DomainViolation::InvalidCharacter(c) => {
                write!(f, "character {c:?} is not allowed (expected a-z, 0-9, '.', '-')")
            }
            DomainViolation::TooFewLabels => write!(f, "domain needs at least two labels"),
            DomainViolation::EmptyLabel => write!(f, "domain contains an empty label"),
            DomainViolation::LabelTooLong(l) => {
                write!(f, "label '{l}' exceeds {MAX_LABEL_LEN} characters")
            }
            DomainViolation::HyphenEdge(l) => {
                write!(f, "label '{l}' starts or ends with a hyphen")
            }
        }
    }
}

/// Check a candidate and report the first rule it breaks.
pub fn check(candidate: &str) -> Result<(), DomainViolation> {
    if candidate.is_empty() {
        return Err(DomainViolation::Empty);
    }
    if candidate.len() > MAX_DOMAIN_LEN {
        return Err(DomainViolation::TooLong(candidate.len()));
    }
    if let Some(c) = candidate
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '.' || *c == '-'))
    {
        return Err(DomainViolation::InvalidCharacter(c));
    }

    let labels: Vec<&str> = candidate.split('.').collect();
    if labels.len() < 2 {
        return Err(DomainViolation::TooFewLabels);
    }
    for label in labels {
        if label.is_empty() {
            return Err(DomainViolation::EmptyLabel);
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainViolation::LabelTooLong(label.to_string()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainViolation::HyphenEdge(label.to_string()));
        }
    }
    Ok(())
}

/// Structural validity of an already lower-cased candidate.
pub fn is_valid(candidate: &str) -> bool {
    check(candidate).is_ok()
}

/// Last label (`com` for `a.example.com`).
pub fn tld_of(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}

/// Last two labels joined (`co.uk` for `a.example.co.uk`), if present.
pub fn last_two_labels(domain: &str) -> Option<&str> {
    let last_dot = domain.rfind('.')?;
    let start = domain[..last_dot].rfind('.').map(|i| i + 1).unwrap_or(0);
    Some(&domain[start..])
}

/// Label parts of a domain, split at the positions the formatter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts<'a> {
    /// All labels except the last, dot-joined
    pub name: &'a str,
    /// Last label
    pub tld: &'a str,
    /// Second-to-last label (empty for single-label input)
    pub sld: &'a str,
    /// Labels before the second-to-last, dot-joined (empty if ≤2 labels)
    pub subdomain: &'a str,
}

impl<'a> DomainParts<'a> {
    pub fn split(domain: &'a str) -> Self {
        match domain.rsplit_once('.') {
            None => DomainParts {
                name: "",
                tld: domain,
                sld: "",
                subdomain: "",
            },
            Some((name, tld)) => {
                let (subdomain, sld) = name.rsplit_once('.').unwrap_or(("", name));
                DomainParts {
                    name,
                    tld,
                    sld,
                    subdomain,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domains() {
        assert!(is_valid("example.com"));
        assert!(is_valid("a.b.example.co.uk"));
        assert!(is_valid("xn--80ak6aa92e.com"));
        assert!(is_valid("123.example.org"));
    }

    #[test]
    fn test_invalid_domains() {
        assert_eq!(check(""), Err(DomainViolation::Empty));
        assert_eq!(check("localhost"), Err(DomainViolation::TooFewLabels));
        assert_eq!(check("a..com"), Err(DomainViolation::EmptyLabel));
        assert_eq!(
            check("-bad.com"),
            Err(DomainViolation::HyphenEdge("-bad".to_string()))
        );
        assert_eq!(
            check("bad-.com"),
            Err(DomainViolation::HyphenEdge("bad-".to_string()))
        );
        assert_eq!(check("Example.com"), Err(DomainViolation::InvalidCharacter('E')));
        assert_eq!(check("ex_ample.com"), Err(DomainViolation::InvalidCharacter('_')));
    }

    #[test]
    fn test_length_limits() {
        let label63 = "a".repeat(63);
        assert!(is_valid(&format!("{label63}.com")));
        let label64 = "a".repeat(64);
        assert!(matches!(
            check(&format!("{label64}.com")),
            Err(DomainViolation::LabelTooLong(_))
        ));

        let long = vec!["abcdefghi"; 26].join(".");
        assert!(long.len() > MAX_DOMAIN_LEN);
        assert_eq!(check(&long), Err(DomainViolation::TooLong(long.len())));
    }

    #[test]
    fn test_label_helpers() {
        assert_eq!(tld_of("a.example.com"), "com");
        assert_eq!(tld_of("com"), "com");
        assert_eq!(last_two_labels("a.example.co.uk"), Some("co.uk"));
        assert_eq!(last_two_labels("example.com"), Some("example.com"));
        assert_eq!(last_two_labels("com"), None);
    }

    #[test]
    fn test_domain_parts() {
        let p = DomainParts::split("a.b.example.co.uk");
        assert_eq!(p.name, "a.b.example.co");
        assert_eq!(p.tld, "uk");
        assert_eq!(p.sld, "co");
        assert_eq!(p.subdomain, "a.b.example");

        let p = DomainParts::split("example.com");
        assert_eq!(p.sld, "example");
        assert_eq!(p.subdomain, "");
    }
}
