//! Utility functions for domain normalization and input preparation.
//!
//! This module contains helpers that turn raw operator input (lines from a
//! file, comma-separated tokens, pasted URLs) into the clean, deduplicated
//! domain set the scheduler works on.

use std::collections::HashSet;

/// Normalize one raw input token into a bare hostname.
///
/// Strips surrounding whitespace, an optional URL scheme, and everything
/// from the first path separator onward. Returns `None` when nothing
/// usable remains.
///
/// ```
/// use wayback_triage_lib::normalize_domain;
///
/// assert_eq!(normalize_domain("  https://example.com/admin/  "), Some("example.com".to_string()));
/// assert_eq!(normalize_domain("example.com"), Some("example.com".to_string()));
/// assert_eq!(normalize_domain("   "), None);
/// ```
pub fn normalize_domain(raw: &str) -> Option<String> {
    let mut domain = raw.trim();

    for scheme in ["http://", "https://", "//"] {
        if let Some(rest) = domain.strip_prefix(scheme) {
            domain = rest;
            break;
        }
    }

    // Drop any path, query, or fragment
    if let Some(idx) = domain.find(['/', '?', '#']) {
        domain = &domain[..idx];
    }

    let domain = domain.trim();
    if domain.is_empty() {
        None
    } else {
        Some(domain.to_string())
    }
}

/// Normalize and deduplicate a raw input list into the scheduling set.
///
/// Input order is preserved; later duplicates are dropped. Empty and
/// unusable tokens are skipped. The result is exactly the set the final
/// report must cover, one entry per domain.
pub fn prepare_domains(inputs: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut domains = Vec::new();

    for raw in inputs {
        if let Some(domain) = normalize_domain(raw) {
            if seen.insert(domain.clone()) {
                domains.push(domain);
            }
        }
    }

    domains
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_scheme_and_path() {
        assert_eq!(
            normalize_domain("https://example.com/admin/login?x=1"),
            Some("example.com".to_string())
        );
        assert_eq!(
            normalize_domain("http://sub.example.org"),
            Some("sub.example.org".to_string())
        );
        assert_eq!(
            normalize_domain("//cdn.example.net/js/app.js"),
            Some("cdn.example.net".to_string())
        );
    }

    #[test]
    fn test_normalize_strips_whitespace() {
        assert_eq!(
            normalize_domain("  example.com  "),
            Some("example.com".to_string())
        );
        assert_eq!(normalize_domain(""), None);
        assert_eq!(normalize_domain("   "), None);
        assert_eq!(normalize_domain("https://"), None);
    }

    #[test]
    fn test_normalize_leaves_bare_hostnames_alone() {
        assert_eq!(
            normalize_domain("example.com"),
            Some("example.com".to_string())
        );
        // Case is preserved: hostname comparison is left to the resolver
        assert_eq!(
            normalize_domain("Example.COM"),
            Some("Example.COM".to_string())
        );
    }

    #[test]
    fn test_prepare_domains_dedupes_preserving_order() {
        let inputs = vec![
            "b.example.com".to_string(),
            "a.example.com".to_string(),
            "https://b.example.com/path".to_string(),
            "".to_string(),
            "a.example.com".to_string(),
        ];
        assert_eq!(
            prepare_domains(&inputs),
            vec!["b.example.com".to_string(), "a.example.com".to_string()]
        );
    }

    #[test]
    fn test_prepare_domains_empty_input() {
        assert!(prepare_domains(&[]).is_empty());
        assert!(prepare_domains(&["  ".to_string(), "\t".to_string()]).is_empty());
    }
}
