//! # Wayback Triage Library
//!
//! A fast, robust library for reconnaissance triage over large domain sets:
//! archive-history lookups, HTTP liveness probes, and interest-pattern
//! classification of archived URLs, all under a bounded concurrency budget.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wayback_triage_lib::{TriageRunner, TriageConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let runner = TriageRunner::new()?;
//!     let report = runner.run(&["example.com".to_string()]).await?;
//!
//!     for (domain, entry) in &report {
//!         println!(
//!             "{}: {} archived URLs, status {}",
//!             domain, entry.archive.url_count, entry.status.status
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Archive history**: Wayback CDX index lookups with an optional
//!   `waybackurls` subprocess fallback
//! - **Liveness probes**: single-request HTTP status checks with proxy and
//!   redirect control
//! - **Classification**: ordered, configurable interest-pattern tallies
//! - **Bounded concurrency**: fixed-size worker pool, one report per input
//!   domain no matter what fails

// Re-export main public API types and functions
pub use classify::{
    validate_patterns, CategoryMatches, Classification, PatternClassifier, PatternRule,
};
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::TriageError;
pub use probe::{HttpProber, StatusProbe};
pub use providers::{
    is_waybackurls_available, CdxProvider, HistoryProvider, WaybackHistory, WaybackurlsProvider,
};
pub use report::ReportCollector;
pub use runner::TriageRunner;
pub use types::{
    ArchiveResult, DomainReport, HttpStatus, LookupMethod, ProbeScheme, Report, StatusResult,
    TriageConfig,
};
pub use utils::{normalize_domain, prepare_domains};

// Internal modules
mod classify;
mod config;
mod error;
mod probe;
mod providers;
mod report;
mod runner;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TriageError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
