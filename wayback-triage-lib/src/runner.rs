//! The triage engine.
//!
//! This module provides the primary `TriageRunner` struct that fans
//! per-domain pipelines out across a bounded worker pool and aggregates
//! completed reports.
//!
//! For each domain the pipeline runs the archive-history lookup and the
//! liveness probe concurrently (they are independent), then classifies the
//! returned URL set. Every domain in the deduplicated input produces
//! exactly one recorded report, whether its lookups succeeded or failed;
//! no domain's failure cancels another's work, and there is no fail-fast
//! mode; the batch always runs to completion.
//!
//! # Example
//!
//! ```rust,no_run
//! use wayback_triage_lib::{TriageRunner, TriageConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = TriageRunner::with_config(TriageConfig::default().with_concurrency(20))?;
//!     let report = runner.run(&["example.com".to_string()]).await?;
//!
//!     for (domain, entry) in &report {
//!         println!("{}: {} archived URLs", domain, entry.archive.url_count);
//!     }
//!     Ok(())
//! }
//! ```

use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;

use crate::classify::PatternClassifier;
use crate::error::TriageError;
use crate::probe::{HttpProber, StatusProbe};
use crate::providers::{HistoryProvider, WaybackHistory};
use crate::report::ReportCollector;
use crate::types::{DomainReport, Report, TriageConfig};
use crate::utils::prepare_domains;

/// Coordinates history lookups, liveness probes, and classification over a
/// domain set, under a bounded concurrency budget.
pub struct TriageRunner {
    /// Configuration settings for this runner instance
    config: TriageConfig,
    /// Pattern classifier built from the validated configuration
    classifier: PatternClassifier,
    /// Archive-history backend
    history: Arc<dyn HistoryProvider>,
    /// Liveness probe backend
    prober: Arc<dyn StatusProbe>,
}

impl TriageRunner {
    /// Create a runner with default configuration: CDX-backed history with
    /// `waybackurls` fallback, plain HTTP probes, the built-in pattern set.
    pub fn new() -> Result<Self, TriageError> {
        Self::with_config(TriageConfig::default())
    }

    /// Create a runner with custom configuration.
    ///
    /// Fails fast on configuration problems: an invalid pattern set or
    /// proxy URL is rejected here, before any domain is scheduled.
    pub fn with_config(config: TriageConfig) -> Result<Self, TriageError> {
        let classifier = PatternClassifier::new(config.patterns.clone())?;
        let history: Arc<dyn HistoryProvider> = Arc::new(WaybackHistory::from_config(&config)?);
        let prober: Arc<dyn StatusProbe> = Arc::new(HttpProber::from_config(&config)?);

        Ok(Self {
            config,
            classifier,
            history,
            prober,
        })
    }

    /// Create a runner with injected backends.
    ///
    /// This is the substitution seam: tests (and alternative archive
    /// indexes) provide their own `HistoryProvider`/`StatusProbe` while
    /// keeping the scheduling and aggregation behavior under test.
    pub fn with_providers(
        config: TriageConfig,
        history: Arc<dyn HistoryProvider>,
        prober: Arc<dyn StatusProbe>,
    ) -> Result<Self, TriageError> {
        let classifier = PatternClassifier::new(config.patterns.clone())?;
        Ok(Self {
            config,
            classifier,
            history,
            prober,
        })
    }

    /// Get the current configuration for this runner.
    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Run the full triage pipeline for one domain.
    ///
    /// Lookup and probe are independent and run concurrently;
    /// classification strictly follows the lookup since it consumes its
    /// URL set. Never fails: both steps encode their failures as values.
    async fn triage_domain(&self, domain: String) -> DomainReport {
        let (archive, status) = tokio::join!(
            self.history.lookup(&domain),
            self.prober.probe(&domain),
        );

        let classification = self.classifier.classify(&archive.urls);

        DomainReport {
            domain,
            archive,
            status,
            classification,
        }
    }

    /// Triage a raw input list and return the completed report.
    ///
    /// Inputs are normalized and deduplicated first; the report covers
    /// exactly that set, one entry per domain, failures included. An empty
    /// input yields an empty report, not an error.
    pub async fn run(&self, inputs: &[String]) -> Result<Report, TriageError> {
        let collector = ReportCollector::new();

        {
            let mut stream = self.triage_stream(inputs);
            while let Some(report) = stream.next().await {
                collector.record(report)?;
            }
        }

        Ok(collector.into_report())
    }

    /// Triage a raw input list, yielding reports as they complete.
    ///
    /// Completion order is whatever the I/O layer produces; no ordering
    /// is guaranteed between domains. At most `config.concurrency`
    /// per-domain pipelines are in flight at once.
    pub fn triage_stream<'a>(
        &'a self,
        inputs: &[String],
    ) -> Pin<Box<dyn Stream<Item = DomainReport> + Send + 'a>> {
        let domains = prepare_domains(inputs);

        let stream = futures::stream::iter(domains)
            .map(move |domain| self.triage_domain(domain))
            .buffer_unordered(self.config.concurrency);

        Box::pin(stream)
    }
}
