//! Archive-history lookup backends.
//!
//! The [`HistoryProvider`] trait is the injection seam for history lookups:
//! the engine only sees `lookup(domain) -> ArchiveResult`, so tests can
//! substitute a fake provider and alternative archive indexes can slot in
//! without touching the scheduler.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::time::Instant;

use crate::types::{ArchiveResult, LookupMethod, TriageConfig};

/// Wayback CDX API backend
pub mod cdx;

/// `waybackurls` subprocess backend
pub mod waybackurls;

pub use cdx::CdxProvider;
pub use waybackurls::{is_waybackurls_available, WaybackurlsProvider};

/// Capability of looking up a domain's archived URL history.
///
/// Implementations never return an error: lookup failures are encoded in
/// the [`ArchiveResult`] (`lookup_failed: true`, empty `urls`) so a single
/// domain's failure cannot abort the batch.
pub trait HistoryProvider: Send + Sync {
    fn lookup<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, ArchiveResult>;
}

/// The default provider: CDX API first, `waybackurls` subprocess as an
/// optional fallback, the same primary/fallback shape as a protocol stack
/// with a legacy escape hatch.
pub struct WaybackHistory {
    cdx: CdxProvider,
    fallback: Option<WaybackurlsProvider>,
}

impl WaybackHistory {
    /// Build the composite provider from the run configuration.
    pub fn from_config(config: &TriageConfig) -> Result<Self, crate::error::TriageError> {
        let cdx = CdxProvider::from_config(config)?;
        let fallback = config
            .enable_cli_fallback
            .then(|| WaybackurlsProvider::from_config(config));

        Ok(Self { cdx, fallback })
    }

    async fn lookup_domain(&self, domain: &str) -> ArchiveResult {
        let start_time = Instant::now();

        let cdx_error = match self.cdx.fetch(domain).await {
            Ok(urls) => {
                return ArchiveResult::from_urls(domain, urls, LookupMethod::Cdx)
                    .with_duration(start_time.elapsed());
            }
            Err(e) => e,
        };

        if let Some(fallback) = &self.fallback {
            if let Ok(urls) = fallback.fetch(domain).await {
                return ArchiveResult::from_urls(domain, urls, LookupMethod::Waybackurls)
                    .with_duration(start_time.elapsed());
            }
        }

        ArchiveResult::failed(domain, cdx_error.to_string())
            .with_duration(start_time.elapsed())
    }
}

impl HistoryProvider for WaybackHistory {
    fn lookup<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, ArchiveResult> {
        self.lookup_domain(domain).boxed()
    }
}
