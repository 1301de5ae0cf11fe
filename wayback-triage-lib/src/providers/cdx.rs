//! Wayback Machine CDX index client.
//!
//! Queries the public CDX search API for every URL the archive holds for a
//! domain, one original URL per response line. This is the primary history
//! backend; the `waybackurls` subprocess is the fallback.

use std::time::Duration;

use crate::error::TriageError;
use crate::types::TriageConfig;

const CDX_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";

/// HTTP client for the CDX search API.
#[derive(Clone)]
pub struct CdxProvider {
    http_client: reqwest::Client,
    timeout: Duration,
    include_subdomains: bool,
}

impl CdxProvider {
    /// Build a CDX client from the run configuration.
    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("wayback-triage/", env!("CARGO_PKG_VERSION")))
            // Buffer on top of the logical deadline so our timeout fires first
            .timeout(config.lookup_timeout + Duration::from_secs(2))
            .build()
            .map_err(|e| {
                TriageError::network_with_source(
                    "Failed to create CDX HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            timeout: config.lookup_timeout,
            include_subdomains: config.include_subdomains,
        })
    }

    /// The `url=` filter sent to the CDX API: wildcard-subdomain form by
    /// default, host-only when subdomains are excluded.
    fn url_filter(&self, domain: &str) -> String {
        if self.include_subdomains {
            format!("*.{}/*", domain)
        } else {
            format!("{}/*", domain)
        }
    }

    /// Fetch the raw archived-URL list for one domain.
    ///
    /// Bounded by the configured lookup timeout. Duplicate URLs in the
    /// response are preserved as-is.
    pub async fn fetch(&self, domain: &str) -> Result<Vec<String>, TriageError> {
        let request = self
            .http_client
            .get(CDX_ENDPOINT)
            .query(&[
                ("url", self.url_filter(domain).as_str()),
                ("output", "text"),
                ("fl", "original"),
                ("collapse", "urlkey"),
            ])
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| TriageError::timeout("CDX lookup", self.timeout))?
            .map_err(|e| TriageError::lookup(domain, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TriageError::lookup(
                domain,
                format!("CDX server returned {}", status),
            ));
        }

        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .map_err(|_| TriageError::timeout("CDX response body", self.timeout))?
            .map_err(|e| TriageError::lookup(domain, format!("Failed to read body: {}", e)))?;

        Ok(parse_cdx_body(&body))
    }
}

/// One original URL per non-empty line.
fn parse_cdx_body(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
