//! HTTP liveness probing.
//!
//! One minimal GET per domain, reporting the first response's status code.
//! Redirects are not followed unless configured, so 301/302 show up as the
//! meaningful results they are. Connection errors, DNS failures, and
//! timeouts all map to an unreachable result with captured detail; a probe
//! never raises a fatal error.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::time::Instant;

use crate::error::TriageError;
use crate::types::{ProbeScheme, StatusResult, TriageConfig};

/// Capability of checking a domain's live HTTP status.
///
/// Object-safe so test doubles can stand in for the real HTTP client.
pub trait StatusProbe: Send + Sync {
    /// Probe one domain. Always resolves to a value; failures are encoded
    /// as [`HttpStatus::Unreachable`](crate::HttpStatus::Unreachable).
    fn probe<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, StatusResult>;
}

/// Probe URL for a normalized hostname.
fn probe_url(scheme: ProbeScheme, domain: &str) -> String {
    format!("{}://{}", scheme, domain)
}

/// The real prober: a shared `reqwest` client with a bounded per-request
/// timeout, optional proxy, and a configurable redirect policy.
#[derive(Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    scheme: ProbeScheme,
}

impl HttpProber {
    /// Build a prober from the run configuration.
    ///
    /// An invalid proxy URL is a fatal configuration error, detected here
    /// before any worker is dispatched.
    pub fn from_config(config: &TriageConfig) -> Result<Self, TriageError> {
        let redirect_policy = if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("wayback-triage/", env!("CARGO_PKG_VERSION")))
            .timeout(config.probe_timeout)
            .redirect(redirect_policy)
            .danger_accept_invalid_certs(true);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                TriageError::config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            TriageError::network_with_source("Failed to create probe HTTP client", e.to_string())
        })?;

        Ok(Self {
            client,
            scheme: config.probe_scheme,
        })
    }

    async fn probe_domain(&self, domain: &str) -> StatusResult {
        let start_time = Instant::now();
        let url = probe_url(self.scheme, domain);

        let result = match self.client.get(&url).send().await {
            Ok(response) => StatusResult::reachable(domain, response.status().as_u16()),
            Err(err) => StatusResult::unreachable(domain, describe_probe_error(&err)),
        };

        result.with_duration(start_time.elapsed())
    }
}

impl StatusProbe for HttpProber {
    fn probe<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, StatusResult> {
        self.probe_domain(domain).boxed()
    }
}

/// Condense a reqwest failure into the short detail string recorded on an
/// unreachable result.
fn describe_probe_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_url_format() {
        assert_eq!(
            probe_url(ProbeScheme::Http, "example.com"),
            "http://example.com"
        );
        assert_eq!(
            probe_url(ProbeScheme::Https, "sub.example.org"),
            "https://sub.example.org"
        );
    }

    #[test]
    fn test_invalid_proxy_is_config_error() {
        let config = TriageConfig::default().with_proxy("not a proxy url");
        let result = HttpProber::from_config(&config);
        assert!(matches!(
            result,
            Err(TriageError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_valid_proxy_accepted() {
        let config = TriageConfig::default().with_proxy("http://127.0.0.1:8080");
        assert!(HttpProber::from_config(&config).is_ok());
    }
}
