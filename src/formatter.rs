//! Re-rendering of accepted domains.
//!
//! Steps, in order: optional `www.` strip, case transform, structural
//! slice, then either template substitution or prefix/suffix wrapping.
//! Label slicing is purely positional (see [`DomainParts`]).

use crate::config::{CaseMode, DomainFormat, ExtractionConfig};
use crate::domain_utils::DomainParts;

/// Placeholders recognised in an advanced-mask template.
pub const TEMPLATE_PLACEHOLDERS: [&str; 6] =
    ["{domain}", "{name}", "{tld}", "{sld}", "{subdomain}", "{full}"];

/// Whether `template` contains at least one recognised placeholder.
pub fn has_placeholder(template: &str) -> bool {
    TEMPLATE_PLACEHOLDERS.iter().any(|p| template.contains(p))
}

/// Format one accepted candidate according to the config.
pub fn format_domain(domain: &str, config: &ExtractionConfig) -> String {
    let stripped = if config.remove_www {
        domain.strip_prefix("www.").unwrap_or(domain)
    } else {
        domain
    };

    let cased = apply_case(stripped, config.case_mode);
    let sliced = slice(&cased, config.domain_format);

    if config.advanced_mask {
        render_template(&config.template, &sliced, &cased, domain)
    } else {
        format!("{}{}{}", config.prefix, sliced, config.suffix)
    }
}

pub fn apply_case(domain: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Lower => domain.to_lowercase(),
        CaseMode::Upper => domain.to_uppercase(),
        CaseMode::Original => domain.to_string(),
    }
}

/// Structural slice; input with too few labels is returned unchanged.
pub fn slice(domain: &str, format: DomainFormat) -> String {
    match format {
        DomainFormat::Full => domain.to_string(),
        DomainFormat::NoTld => domain
            .rsplit_once('.')
            .map(|(name, _)| name.to_string())
            .unwrap_or_else(|| domain.to_string()),
        DomainFormat::OnlyTld => domain
            .rsplit_once('.')
            .map(|(_, tld)| format!(".{tld}"))
            .unwrap_or_else(|| domain.to_string()),
        DomainFormat::Sld => match DomainParts::split(domain) {
            DomainParts { sld, .. } if !sld.is_empty() => sld.to_string(),
            _ => domain.to_string(),
        },
    }
}

/// Substitute the placeholders. `sliced` feeds `{domain}`, `whole` (after
/// www-strip and case) feeds the label placeholders, `original` is the
/// candidate as it entered the formatter.
pub fn render_template(template: &str, sliced: &str, whole: &str, original: &str) -> String {
    let parts = DomainParts::split(whole);
    let mut out = String::with_capacity(template.len() + whole.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let value = match tail.find('}') {
            Some(close) => match &tail[..=close] {
                "{domain}" => Some(sliced),
                "{name}" => Some(parts.name),
                "{tld}" => Some(parts.tld),
                "{sld}" => Some(parts.sld),
                "{subdomain}" => Some(parts.subdomain),
                "{full}" => Some(original),
                _ => None,
            }
            .map(|v| (v, close + 1)),
            None => None,
        };

        match value {
            Some((v, consumed)) => {
                out.push_str(v);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
