//! Shared result store for a triage run.
//!
//! Workers never touch the report map directly: each per-domain pipeline
//! produces a private [`DomainReport`] and hands the finished value to the
//! collector, whose serialized writes are the only mutation path. One
//! record per domain, ever.

use std::sync::Mutex;

use crate::error::TriageError;
use crate::types::{DomainReport, Report};

/// Thread-safe, insert-only store of completed domain reports.
#[derive(Debug, Default)]
pub struct ReportCollector {
    entries: Mutex<Report>,
}

impl ReportCollector {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed domain report.
    ///
    /// Writes are serialized; recording the same domain twice violates the
    /// scheduler's exactly-once contract and is rejected as an internal
    /// error rather than silently overwriting.
    pub fn record(&self, report: DomainReport) -> Result<(), TriageError> {
        let mut entries = self.entries.lock().expect("report store poisoned");

        if entries.contains_key(&report.domain) {
            return Err(TriageError::internal(format!(
                "Duplicate report recorded for domain '{}'",
                report.domain
            )));
        }

        entries.insert(report.domain.clone(), report);
        Ok(())
    }

    /// Copy of the current state. Safe to call before the run completes,
    /// for progress display or partial-result flushing.
    pub fn snapshot(&self) -> Report {
        self.entries.lock().expect("report store poisoned").clone()
    }

    /// Number of domains recorded so far.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("report store poisoned").len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the collector and return the completed report.
    pub fn into_report(self) -> Report {
        self.entries
            .into_inner()
            .expect("report store poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use crate::types::{ArchiveResult, LookupMethod, StatusResult};

    fn make_report(domain: &str) -> DomainReport {
        DomainReport {
            domain: domain.to_string(),
            archive: ArchiveResult::from_urls(domain, vec![], LookupMethod::Cdx),
            status: StatusResult::reachable(domain, 200),
            classification: Classification::default(),
        }
    }

    #[test]
    fn test_record_and_snapshot() {
        let collector = ReportCollector::new();
        collector.record(make_report("a.com")).unwrap();
        collector.record(make_report("b.com")).unwrap();

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key("a.com"));
        assert!(snapshot.contains_key("b.com"));

        // Snapshot is a copy; the collector keeps accepting records
        collector.record(make_report("c.com")).unwrap();
        assert_eq!(collector.len(), 3);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_duplicate_record_rejected() {
        let collector = ReportCollector::new();
        collector.record(make_report("a.com")).unwrap();

        let err = collector.record(make_report("a.com")).unwrap_err();
        assert!(matches!(err, TriageError::Internal { .. }));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_into_report_returns_sorted_map() {
        let collector = ReportCollector::new();
        collector.record(make_report("b.com")).unwrap();
        collector.record(make_report("a.com")).unwrap();

        let report = collector.into_report();
        let domains: Vec<&String> = report.keys().collect();
        assert_eq!(domains, vec!["a.com", "b.com"]);
    }
}
