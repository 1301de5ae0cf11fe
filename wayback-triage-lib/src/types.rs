//! Core data types for reconnaissance triage.
//!
//! This module defines the main data structures used throughout the library:
//! per-domain lookup/probe/classification results, the merged domain report,
//! and the configuration options for a triage run.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::classify::{Classification, PatternRule};

/// Result of an archive-history lookup for one domain.
///
/// Produced by a [`HistoryProvider`](crate::HistoryProvider); immutable once
/// created. A failed lookup is a value, not an error: `lookup_failed` is set
/// and `urls` is empty, so one bad domain never aborts a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveResult {
    /// The domain that was looked up (e.g., "example.com")
    pub domain: String,

    /// Number of archived URLs returned. Always equals `urls.len()`;
    /// duplicates in the raw archive response are preserved and counted.
    pub url_count: usize,

    /// The raw archived URL strings. Kept in memory for classification and
    /// verbose display, but excluded from serialized reports (counts are
    /// the report currency).
    #[serde(skip)]
    pub urls: Vec<String>,

    /// Whether the lookup errored or timed out
    pub lookup_failed: bool,

    /// Captured failure detail when the lookup failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    /// Which backend produced this result
    pub method: LookupMethod,

    /// How long the lookup took
    #[serde(skip)]
    pub lookup_duration: Option<Duration>,
}

impl ArchiveResult {
    /// Build a successful result from a raw URL list.
    pub fn from_urls(domain: impl Into<String>, urls: Vec<String>, method: LookupMethod) -> Self {
        Self {
            domain: domain.into(),
            url_count: urls.len(),
            urls,
            lookup_failed: false,
            error_detail: None,
            method,
            lookup_duration: None,
        }
    }

    /// Build a failed result (timeout, non-zero exit, network error).
    pub fn failed(domain: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            url_count: 0,
            urls: Vec::new(),
            lookup_failed: true,
            error_detail: Some(detail.into()),
            method: LookupMethod::Unknown,
            lookup_duration: None,
        }
    }

    /// Attach the elapsed lookup time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.lookup_duration = Some(duration);
        self
    }
}

/// Backend used for an archive-history lookup.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum LookupMethod {
    /// Wayback Machine CDX index over HTTP
    #[serde(rename = "cdx")]
    Cdx,

    /// The system `waybackurls` binary
    #[serde(rename = "waybackurls")]
    Waybackurls,

    /// Lookup failed before any backend answered
    #[serde(rename = "unknown")]
    Unknown,
}

impl std::fmt::Display for LookupMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupMethod::Cdx => write!(f, "cdx"),
            LookupMethod::Waybackurls => write!(f, "waybackurls"),
            LookupMethod::Unknown => write!(f, "unknown"),
        }
    }
}

/// Outcome of a liveness probe: a real HTTP status code, or unreachable.
///
/// Redirect codes (301, 302, ...) are meaningful results, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatus {
    Code(u16),
    Unreachable,
}

impl Serialize for HttpStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HttpStatus::Code(code) => serializer.serialize_u16(*code),
            HttpStatus::Unreachable => serializer.serialize_str("unreachable"),
        }
    }
}

impl std::fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpStatus::Code(code) => write!(f, "{}", code),
            HttpStatus::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Result of a single HTTP liveness probe. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    /// The domain that was probed
    pub domain: String,

    /// Status code of the first response, or `Unreachable`
    pub status: HttpStatus,

    /// Captured connection/DNS/timeout detail when unreachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,

    /// How long the probe took
    #[serde(skip)]
    pub probe_duration: Option<Duration>,
}

impl StatusResult {
    /// Build a result carrying a real status code.
    pub fn reachable(domain: impl Into<String>, code: u16) -> Self {
        Self {
            domain: domain.into(),
            status: HttpStatus::Code(code),
            error_detail: None,
            probe_duration: None,
        }
    }

    /// Build an unreachable result with the captured failure detail.
    pub fn unreachable(domain: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            status: HttpStatus::Unreachable,
            error_detail: Some(detail.into()),
            probe_duration: None,
        }
    }

    /// Attach the elapsed probe time.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.probe_duration = Some(duration);
        self
    }
}

/// The complete triage record for one domain: archive history, liveness,
/// and classification merged together. Owned by the report store once
/// recorded; never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub domain: String,
    pub archive: ArchiveResult,
    pub status: StatusResult,
    pub classification: Classification,
}

/// The full result set of one run: one entry per deduplicated input domain.
///
/// Sorted by domain so file and JSON output are deterministic regardless of
/// completion order.
pub type Report = BTreeMap<String, DomainReport>;

/// URL scheme used for liveness probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeScheme {
    Http,
    Https,
}

impl std::fmt::Display for ProbeScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeScheme::Http => write!(f, "http"),
            ProbeScheme::Https => write!(f, "https"),
        }
    }
}

impl std::str::FromStr for ProbeScheme {
    type Err = crate::error::TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(ProbeScheme::Http),
            "https" => Ok(ProbeScheme::Https),
            other => Err(crate::error::TriageError::config(format!(
                "Invalid probe scheme '{}', expected 'http' or 'https'",
                other
            ))),
        }
    }
}

/// Configuration options for a triage run.
///
/// Tunes concurrency, per-call timeouts, probe behavior, and the pattern
/// set used for classification.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Maximum number of concurrent per-domain pipelines
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Timeout for each archive-history lookup
    /// Default: 30 seconds
    pub lookup_timeout: Duration,

    /// Timeout for each liveness probe
    /// Default: 10 seconds
    pub probe_timeout: Duration,

    /// Proxy URL forwarded to the probe HTTP client
    /// Default: none
    pub proxy: Option<String>,

    /// Whether probes follow redirects. When false (the default) the first
    /// response's status code is reported, so 301/302 are visible results.
    pub follow_redirects: bool,

    /// Scheme used to build probe URLs
    /// Default: http
    pub probe_scheme: ProbeScheme,

    /// Whether archive lookups cover subdomains (`*.domain/*`)
    /// Default: true
    pub include_subdomains: bool,

    /// Whether to fall back to the `waybackurls` binary when the CDX
    /// lookup fails
    /// Default: true
    pub enable_cli_fallback: bool,

    /// Ordered interest-pattern rules applied by the classifier
    pub patterns: Vec<PatternRule>,
}

impl Default for TriageConfig {
    /// Create a sensible default configuration.
    ///
    /// The defaults mirror single-operator recon usage: a modest worker
    /// pool and conservative timeouts.
    fn default() -> Self {
        Self {
            concurrency: 10,
            lookup_timeout: Duration::from_secs(30),
            probe_timeout: Duration::from_secs(10),
            proxy: None,
            follow_redirects: false,
            probe_scheme: ProbeScheme::Http,
            include_subdomains: true,
            enable_cli_fallback: true,
            patterns: PatternRule::defaults(),
        }
    }
}

impl TriageConfig {
    /// Set the worker-pool size. Clamped to 1-100 to bound the outbound
    /// request rate independent of input size.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the per-lookup timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Set the per-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Route probes through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Enable or disable redirect following for probes.
    pub fn with_follow_redirects(mut self, enabled: bool) -> Self {
        self.follow_redirects = enabled;
        self
    }

    /// Set the probe scheme.
    pub fn with_probe_scheme(mut self, scheme: ProbeScheme) -> Self {
        self.probe_scheme = scheme;
        self
    }

    /// Include or exclude subdomains in archive lookups.
    pub fn with_subdomains(mut self, enabled: bool) -> Self {
        self.include_subdomains = enabled;
        self
    }

    /// Enable or disable the `waybackurls` subprocess fallback.
    pub fn with_cli_fallback(mut self, enabled: bool) -> Self {
        self.enable_cli_fallback = enabled;
        self
    }

    /// Replace the classifier's pattern set.
    pub fn with_patterns(mut self, patterns: Vec<PatternRule>) -> Self {
        self.patterns = patterns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.lookup_timeout, Duration::from_secs(30));
        assert_eq!(config.probe_timeout, Duration::from_secs(10));
        assert!(!config.follow_redirects);
        assert!(config.include_subdomains);
        assert!(config.enable_cli_fallback);
        assert_eq!(config.probe_scheme, ProbeScheme::Http);
        assert!(!config.patterns.is_empty());
    }

    #[test]
    fn test_concurrency_clamped() {
        assert_eq!(TriageConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(
            TriageConfig::default().with_concurrency(500).concurrency,
            100
        );
        assert_eq!(TriageConfig::default().with_concurrency(25).concurrency, 25);
    }

    #[test]
    fn test_archive_result_count_matches_urls() {
        let result = ArchiveResult::from_urls(
            "example.com",
            vec!["http://example.com/a".into(), "http://example.com/a".into()],
            LookupMethod::Cdx,
        );
        assert_eq!(result.url_count, 2);
        assert!(!result.lookup_failed);
    }

    #[test]
    fn test_failed_archive_result_is_empty() {
        let result = ArchiveResult::failed("example.com", "query timed out");
        assert_eq!(result.url_count, 0);
        assert!(result.urls.is_empty());
        assert!(result.lookup_failed);
        assert_eq!(result.error_detail.as_deref(), Some("query timed out"));
        assert_eq!(result.method, LookupMethod::Unknown);
    }

    #[test]
    fn test_http_status_display() {
        assert_eq!(HttpStatus::Code(301).to_string(), "301");
        assert_eq!(HttpStatus::Unreachable.to_string(), "unreachable");
    }

    #[test]
    fn test_probe_scheme_parsing() {
        assert_eq!("http".parse::<ProbeScheme>().unwrap(), ProbeScheme::Http);
        assert_eq!("HTTPS".parse::<ProbeScheme>().unwrap(), ProbeScheme::Https);
        assert!("gopher".parse::<ProbeScheme>().is_err());
    }
}
