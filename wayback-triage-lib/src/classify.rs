//! Interest-pattern classification of archived URL sets.
//!
//! The classifier buckets raw URL strings by a configurable, ordered list of
//! path-segment markers (admin panels, API endpoints, credential parameters,
//! ...). Matching is case-sensitive literal substring matching on the raw
//! URL (no case folding, no query stripping) and non-exclusive: a URL like
//! `/admin/api/keys` counts toward both the admin and the api categories.
//! Classification is pure in-memory computation; it never suspends.

use serde::{Deserialize, Serialize};

use crate::error::TriageError;

/// Default marker set, matching the tallies recon operators expect from
/// wayback triage output.
const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("/api/", "/api/"),
    ("/admin/", "/admin/"),
    ("/js/", "/js/"),
    ("/account/", "/account/"),
    ("/cgi-bin/", "/cgi-bin/"),
    ("/wp-admin/", "/wp-admin/"),
    ("response_type=token", "response_type=token"),
    ("password=", "password="),
    ("isAdmin=", "isAdmin="),
];

/// One named interest pattern: a category label and the literal marker a
/// URL must contain to land in it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternRule {
    /// Category label shown in reports (e.g., "/admin/")
    pub name: String,

    /// Literal substring a URL must contain
    pub marker: String,
}

impl PatternRule {
    /// Create a new rule.
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
        }
    }

    /// Whether a URL belongs to this category.
    pub fn matches(&self, url: &str) -> bool {
        url.contains(&self.marker)
    }

    /// The built-in rule set. Category names equal their markers, the way
    /// the classic interesting-directories tally reads.
    pub fn defaults() -> Vec<PatternRule> {
        DEFAULT_PATTERNS
            .iter()
            .map(|(name, marker)| PatternRule::new(*name, *marker))
            .collect()
    }
}

/// Validate a pattern set before any work is dispatched.
///
/// Rules must have non-empty names and markers, and names must be unique;
/// duplicate names would make the per-category tallies ambiguous.
pub fn validate_patterns(patterns: &[PatternRule]) -> Result<(), TriageError> {
    let mut seen = std::collections::HashSet::new();

    for rule in patterns {
        if rule.name.trim().is_empty() {
            return Err(TriageError::config("Pattern names cannot be empty"));
        }
        if rule.marker.is_empty() {
            return Err(TriageError::config(format!(
                "Pattern '{}' has an empty marker",
                rule.name
            )));
        }
        if !seen.insert(rule.name.as_str()) {
            return Err(TriageError::config(format!(
                "Duplicate pattern name '{}'",
                rule.name
            )));
        }
    }

    Ok(())
}

/// Matches collected for one category: the label, the tally, and the URLs
/// that produced it (in input order). `count` always equals `urls.len()`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryMatches {
    pub name: String,
    pub count: usize,
    #[serde(skip)]
    pub urls: Vec<String>,
}

/// Per-domain classification outcome: the nonzero categories, in pattern
/// configuration order. Zero-match categories are omitted rather than
/// reported as zero.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub categories: Vec<CategoryMatches>,
}

impl Classification {
    /// Whether no category matched anything.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// The tally for a named category, if it had any matches.
    pub fn count_for(&self, name: &str) -> Option<usize> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.count)
    }
}

/// Classifier over a fixed, validated pattern set.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    patterns: Vec<PatternRule>,
}

impl PatternClassifier {
    /// Build a classifier, rejecting invalid pattern sets up front.
    pub fn new(patterns: Vec<PatternRule>) -> Result<Self, TriageError> {
        validate_patterns(&patterns)?;
        Ok(Self { patterns })
    }

    /// The configured rules, in order.
    pub fn patterns(&self) -> &[PatternRule] {
        &self.patterns
    }

    /// Bucket a URL list by the configured patterns.
    ///
    /// Every category whose marker appears in a URL receives that URL;
    /// duplicate URLs in the input count once per occurrence. Deterministic
    /// for a given input and pattern set.
    pub fn classify(&self, urls: &[String]) -> Classification {
        let mut buckets: Vec<Vec<String>> = vec![Vec::new(); self.patterns.len()];

        for url in urls {
            for (rule, bucket) in self.patterns.iter().zip(buckets.iter_mut()) {
                if rule.matches(url) {
                    bucket.push(url.clone());
                }
            }
        }

        let categories = self
            .patterns
            .iter()
            .zip(buckets)
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(rule, bucket)| CategoryMatches {
                name: rule.name.clone(),
                count: bucket.len(),
                urls: bucket,
            })
            .collect();

        Classification { categories }
    }
}

impl Default for PatternClassifier {
    fn default() -> Self {
        Self {
            patterns: PatternRule::defaults(),
        }
    }
}
