//! Console and file presentation for wayback-triage.
//!
//! This module renders domain reports in the line-oriented triage format,
//! with status-dependent colors on the terminal and plain text for report
//! files. Uses only the `console` crate (already a dependency).

use console::style;
use std::time::Duration;

use wayback_triage_lib::{DomainReport, HttpStatus, Report};

// ── Plain formatting (report files, tests) ──────────────────────────────────

/// The per-domain summary line:
/// `domain | Wayback URLs: <count|no data> | HTTP Status Code: <code|unreachable>`
pub fn format_summary_line(entry: &DomainReport) -> String {
    let count = if entry.archive.lookup_failed {
        "no data".to_string()
    } else {
        entry.archive.url_count.to_string()
    };

    format!(
        "{} | Wayback URLs: {} | HTTP Status Code: {}",
        entry.domain, count, entry.status.status
    )
}

/// One ` - <category> URLs: [<count>]` line per nonzero category, in
/// pattern order.
pub fn format_category_lines(entry: &DomainReport) -> Vec<String> {
    entry
        .classification
        .categories
        .iter()
        .map(|category| format!(" - {} URLs: [{}]", category.name, category.count))
        .collect()
}

/// Render the whole report as plain text, sorted by domain, for `-o`.
pub fn format_plain_report(report: &Report) -> String {
    let mut out = String::new();

    for entry in report.values() {
        out.push_str(&format_summary_line(entry));
        out.push('\n');
        for line in format_category_lines(entry) {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out
}

// ── Colored streaming output ─────────────────────────────────────────────────

/// Print one completed domain report to stdout with colors.
///
/// Verbosity 1 adds failure details and the archived URL listing;
/// verbosity 2 adds per-category matches and timing diagnostics.
pub fn print_result(entry: &DomainReport, verbosity: u8) {
    let count_str = if entry.archive.lookup_failed {
        style("no data").yellow().to_string()
    } else if (5..=9999).contains(&entry.archive.url_count) {
        style(entry.archive.url_count).green().to_string()
    } else {
        entry.archive.url_count.to_string()
    };

    let status_str = match entry.status.status {
        HttpStatus::Code(200) => style("200").green().to_string(),
        HttpStatus::Code(code @ (301 | 302 | 404)) => style(code).yellow().to_string(),
        HttpStatus::Code(code @ (400 | 401 | 403 | 503)) => style(code).red().to_string(),
        HttpStatus::Code(code) => code.to_string(),
        HttpStatus::Unreachable => style("unreachable").red().to_string(),
    };

    println!(
        "{} | Wayback URLs: {} | HTTP Status Code: {}",
        style(&entry.domain).bold(),
        count_str,
        status_str,
    );

    for category in &entry.classification.categories {
        println!(" - {} URLs: [{}]", category.name, category.count);
    }

    if verbosity >= 1 {
        if let Some(detail) = &entry.archive.error_detail {
            println!("   {} {}", style("lookup:").dim(), style(detail).dim());
        }
        if let Some(detail) = &entry.status.error_detail {
            println!("   {} {}", style("probe:").dim(), style(detail).dim());
        }
        for url in &entry.archive.urls {
            println!("   {}", style(url).dim());
        }
    }

    if verbosity >= 2 {
        for category in &entry.classification.categories {
            println!("   {}", style(format!("{} matches:", category.name)).dim());
            for url in &category.urls {
                println!("     {}", style(url).dim());
            }
        }
        let lookup_ms = entry
            .archive
            .lookup_duration
            .map(|d| format!("{}ms", d.as_millis()))
            .unwrap_or_else(|| "-".to_string());
        let probe_ms = entry
            .status
            .probe_duration
            .map(|d| format!("{}ms", d.as_millis()))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "   {} lookup {} via {}, probe {}",
            style("└─").dim(),
            lookup_ms,
            entry.archive.method,
            probe_ms,
        );
    }
}

/// Print the final summary bar with colored counts.
pub fn print_summary(report: &Report, duration: Duration) {
    let total = report.len();
    let reachable = report
        .values()
        .filter(|e| e.status.status != HttpStatus::Unreachable)
        .count();
    let unreachable = total - reachable;
    let no_history = report
        .values()
        .filter(|e| e.archive.lookup_failed)
        .count();

    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} reachable", reachable)).green(),
        style("|").dim(),
        style(format!("{} unreachable", unreachable)).red(),
        style("|").dim(),
        style(format!("{} without history", no_history)).yellow(),
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wayback_triage_lib::{
        ArchiveResult, CategoryMatches, Classification, LookupMethod, StatusResult,
    };

    fn make_entry(
        domain: &str,
        url_count: usize,
        lookup_failed: bool,
        status: HttpStatus,
        categories: &[(&str, usize)],
    ) -> DomainReport {
        let archive = if lookup_failed {
            ArchiveResult::failed(domain, "archive query timed out")
        } else {
            ArchiveResult {
                url_count,
                ..ArchiveResult::from_urls(domain, vec![], LookupMethod::Cdx)
            }
        };

        let status = match status {
            HttpStatus::Code(code) => StatusResult::reachable(domain, code),
            HttpStatus::Unreachable => StatusResult::unreachable(domain, "connection refused"),
        };

        DomainReport {
            domain: domain.to_string(),
            archive,
            status,
            classification: Classification {
                categories: categories
                    .iter()
                    .map(|(name, count)| CategoryMatches {
                        name: name.to_string(),
                        count: *count,
                        urls: Vec::new(),
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_summary_line_matches_triage_format() {
        let entry = make_entry(
            "google.com",
            12514,
            false,
            HttpStatus::Code(301),
            &[("/admin/", 6444)],
        );
        assert_eq!(
            format_summary_line(&entry),
            "google.com | Wayback URLs: 12514 | HTTP Status Code: 301"
        );
        assert_eq!(
            format_category_lines(&entry),
            vec![" - /admin/ URLs: [6444]"]
        );
    }

    #[test]
    fn test_category_lines_in_order() {
        let entry = make_entry(
            "google.org",
            414037,
            false,
            HttpStatus::Code(302),
            &[
                ("/api/", 81),
                ("/js/", 265),
                ("/account/", 1),
                ("/cgi-bin/", 9),
                ("/wp-admin/", 2),
            ],
        );
        assert_eq!(
            format_summary_line(&entry),
            "google.org | Wayback URLs: 414037 | HTTP Status Code: 302"
        );
        assert_eq!(
            format_category_lines(&entry),
            vec![
                " - /api/ URLs: [81]",
                " - /js/ URLs: [265]",
                " - /account/ URLs: [1]",
                " - /cgi-bin/ URLs: [9]",
                " - /wp-admin/ URLs: [2]",
            ]
        );
    }

    #[test]
    fn test_failed_lookup_renders_no_data() {
        let entry = make_entry("dead.com", 0, true, HttpStatus::Unreachable, &[]);
        assert_eq!(
            format_summary_line(&entry),
            "dead.com | Wayback URLs: no data | HTTP Status Code: unreachable"
        );
        assert!(format_category_lines(&entry).is_empty());
    }

    #[test]
    fn test_plain_report_is_sorted_and_complete() {
        let mut report = Report::new();
        for entry in [
            make_entry("b.com", 3, false, HttpStatus::Code(200), &[]),
            make_entry("a.com", 0, true, HttpStatus::Code(404), &[]),
        ] {
            report.insert(entry.domain.clone(), entry);
        }

        let text = format_plain_report(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "a.com | Wayback URLs: no data | HTTP Status Code: 404",
                "b.com | Wayback URLs: 3 | HTTP Status Code: 200",
            ]
        );
    }
}
