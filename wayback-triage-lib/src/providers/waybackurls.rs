//! Archive lookups via the system `waybackurls` binary.
//!
//! Fallback backend for when the CDX API is unreachable or erroring. Runs
//! `waybackurls <domain>` and reads one URL per stdout line, under the same
//! bounded timeout as the HTTP backend.

use std::time::Duration;
use tokio::process::Command;

use crate::error::TriageError;
use crate::types::TriageConfig;

/// Subprocess-backed history lookup using `waybackurls`.
#[derive(Debug, Clone)]
pub struct WaybackurlsProvider {
    timeout: Duration,
    include_subdomains: bool,
}

impl WaybackurlsProvider {
    /// Build a provider from the run configuration.
    pub fn from_config(config: &TriageConfig) -> Self {
        Self {
            timeout: config.lookup_timeout,
            include_subdomains: config.include_subdomains,
        }
    }

    /// Fetch the archived-URL list for one domain by running `waybackurls`.
    ///
    /// A missing binary, non-zero exit, or timeout is an error for the
    /// caller to convert into a recorded lookup failure.
    pub async fn fetch(&self, domain: &str) -> Result<Vec<String>, TriageError> {
        let mut command = Command::new("waybackurls");
        if !self.include_subdomains {
            command.arg("-no-subs");
        }
        command.arg(domain);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| TriageError::timeout("waybackurls", self.timeout))?
            .map_err(|e| {
                TriageError::lookup(domain, format!("Failed to run waybackurls: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TriageError::lookup(
                domain,
                format!(
                    "waybackurls exited with {}: {}",
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// Whether the `waybackurls` binary can be spawned on this system.
pub async fn is_waybackurls_available() -> bool {
    Command::new("waybackurls")
        .arg("-h")
        .output()
        .await
        .is_ok()
}
