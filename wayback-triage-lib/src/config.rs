//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and from
//! `WT_*` environment variables, with proper precedence rules. Invalid
//! values in config files are hard errors; invalid environment values warn
//! and are ignored so a stale shell export cannot brick the tool.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classify::{validate_patterns, PatternRule};
use crate::error::TriageError;

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 25
/// timeout = "10s"
/// lookup_timeout = "45s"
/// scheme = "https"
///
/// [[patterns]]
/// name = "/graphql/"
/// marker = "/graphql/"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Interest-pattern rules replacing the built-in set. Order in the
    /// file is the order categories are evaluated and reported in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<PatternRule>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default concurrency level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// Default probe timeout (as string, e.g., "10s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Default archive-lookup timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_timeout: Option<String>,

    /// Default proxy URL for probes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,

    /// Default probe scheme ("http" or "https")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    /// Whether probes follow redirects by default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to emit warnings for config issues
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, TriageError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TriageError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            TriageError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;

        // Validate the loaded configuration
        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// Looks for configuration files in standard locations and merges them,
    /// local files winning over global ones.
    pub fn discover_and_load(&self) -> Result<FileConfig, TriageError> {
        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        // 1. Load XDG config (lowest precedence)
        if let Some(xdg_path) = self.get_xdg_config_path() {
            if let Ok(config) = self.load_file(&xdg_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(xdg_path);
            }
        }

        // 2. Load home-directory config
        if let Some(global_path) = self.get_global_config_path() {
            if let Ok(config) = self.load_file(&global_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(global_path);
            }
        }

        // 3. Load local config (highest precedence)
        if let Some(local_path) = self.get_local_config_path() {
            if let Ok(config) = self.load_file(&local_path) {
                merged_config = self.merge_configs(merged_config, config);
                loaded_files.push(local_path);
            }
        }

        if self.verbose && loaded_files.len() > 1 {
            eprintln!("Multiple config files found. Using precedence:");
            for (i, path) in loaded_files.iter().enumerate() {
                let status = if i == loaded_files.len() - 1 {
                    "active"
                } else {
                    "overridden"
                };
                eprintln!("   {} ({})", path.display(), status);
            }
        }

        Ok(merged_config)
    }

    /// Configuration files in the current directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./wayback-triage.toml", "./.wayback-triage.toml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Some(path.to_path_buf());
            }
        }

        None
    }

    /// Configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        if let Some(home) = env::var_os("HOME") {
            let candidates = [".wayback-triage.toml", "wayback-triage.toml"];

            for candidate in &candidates {
                let path = Path::new(&home).join(candidate);
                if path.exists() {
                    return Some(path);
                }
            }
        }

        None
    }

    /// XDG Base Directory config path.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("wayback-triage").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.concurrency.is_some() {
                        lower_defaults.concurrency = higher_defaults.concurrency;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.lookup_timeout.is_some() {
                        lower_defaults.lookup_timeout = higher_defaults.lookup_timeout;
                    }
                    if higher_defaults.proxy.is_some() {
                        lower_defaults.proxy = higher_defaults.proxy;
                    }
                    if higher_defaults.scheme.is_some() {
                        lower_defaults.scheme = higher_defaults.scheme;
                    }
                    if higher_defaults.follow_redirects.is_some() {
                        lower_defaults.follow_redirects = higher_defaults.follow_redirects;
                    }
                    Some(lower_defaults)
                }
                (None, Some(higher_defaults)) => Some(higher_defaults),
                (Some(lower_defaults), None) => Some(lower_defaults),
                (None, None) => None,
            },
            // Pattern sets don't merge entry-wise: the higher file's set
            // replaces the lower one wholesale, keeping its ordering intact
            patterns: higher.patterns.or(lower.patterns),
        }
    }

    /// Validate a configuration for common issues.
    fn validate_config(&self, config: &FileConfig) -> Result<(), TriageError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > 100 {
                    return Err(TriageError::config(
                        "Concurrency must be between 1 and 100",
                    ));
                }
            }

            for (label, value) in [
                ("timeout", &defaults.timeout),
                ("lookup_timeout", &defaults.lookup_timeout),
            ] {
                if let Some(timeout_str) = value {
                    if parse_timeout_string(timeout_str).is_none() {
                        return Err(TriageError::config(format!(
                            "Invalid {} '{}'. Use format like '5s', '30s', '2m'",
                            label, timeout_str
                        )));
                    }
                }
            }

            if let Some(scheme) = &defaults.scheme {
                scheme.parse::<crate::types::ProbeScheme>()?;
            }
        }

        if let Some(patterns) = &config.patterns {
            if patterns.is_empty() {
                return Err(TriageError::config(
                    "Pattern list cannot be empty; omit the section to use the built-in set",
                ));
            }
            validate_patterns(patterns)?;
        }

        Ok(())
    }
}

/// Environment variable configuration that mirrors CLI options.
///
/// Values that can be set via `WT_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub timeout: Option<String>,
    pub lookup_timeout: Option<String>,
    pub proxy: Option<String>,
    pub scheme: Option<String>,
    pub follow_redirects: Option<bool>,
    pub config: Option<String>,
}

/// Load configuration from `WT_*` environment variables.
///
/// Invalid values are logged as warnings (when verbose) and ignored.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    let mut env_config = EnvConfig::default();

    if let Ok(val) = env::var("WT_CONCURRENCY") {
        match val.parse::<usize>() {
            Ok(concurrency) if (1..=100).contains(&concurrency) => {
                env_config.concurrency = Some(concurrency);
                if verbose {
                    println!("Using WT_CONCURRENCY={}", concurrency);
                }
            }
            _ => {
                if verbose {
                    eprintln!("Invalid WT_CONCURRENCY='{}', must be 1-100", val);
                }
            }
        }
    }

    for (var, slot) in [
        ("WT_TIMEOUT", &mut env_config.timeout),
        ("WT_LOOKUP_TIMEOUT", &mut env_config.lookup_timeout),
    ] {
        if let Ok(timeout_str) = env::var(var) {
            if parse_timeout_string(&timeout_str).is_some() {
                *slot = Some(timeout_str.clone());
                if verbose {
                    println!("Using {}={}", var, timeout_str);
                }
            } else if verbose {
                eprintln!(
                    "Invalid {}='{}', use format like '5s', '30s', '2m'",
                    var, timeout_str
                );
            }
        }
    }

    if let Ok(proxy) = env::var("WT_PROXY") {
        if !proxy.trim().is_empty() {
            env_config.proxy = Some(proxy.clone());
            if verbose {
                println!("Using WT_PROXY={}", proxy);
            }
        }
    }

    if let Ok(scheme) = env::var("WT_SCHEME") {
        if scheme.parse::<crate::types::ProbeScheme>().is_ok() {
            env_config.scheme = Some(scheme.clone());
            if verbose {
                println!("Using WT_SCHEME={}", scheme);
            }
        } else if verbose {
            eprintln!("Invalid WT_SCHEME='{}', use 'http' or 'https'", scheme);
        }
    }

    if let Ok(val) = env::var("WT_FOLLOW_REDIRECTS") {
        match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => {
                env_config.follow_redirects = Some(true);
                if verbose {
                    println!("Using WT_FOLLOW_REDIRECTS=true");
                }
            }
            "false" | "0" | "no" | "off" => {
                env_config.follow_redirects = Some(false);
                if verbose {
                    println!("Using WT_FOLLOW_REDIRECTS=false");
                }
            }
            _ => {
                if verbose {
                    eprintln!("Invalid WT_FOLLOW_REDIRECTS='{}', use true/false", val);
                }
            }
        }
    }

    if let Ok(config_path) = env::var("WT_CONFIG") {
        if !config_path.trim().is_empty() {
            env_config.config = Some(config_path.clone());
            if verbose {
                println!("Using WT_CONFIG={}", config_path);
            }
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// Bare numbers are treated as seconds. Returns `None` if parsing fails.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| m * 60)
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30s"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[defaults]
concurrency = 25
timeout = "8s"
scheme = "https"

[[patterns]]
name = "/admin/"
marker = "/admin/"

[[patterns]]
name = "/graphql/"
marker = "/graphql/"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let defaults = config.defaults.unwrap();
        assert_eq!(defaults.concurrency, Some(25));
        assert_eq!(defaults.timeout, Some("8s".to_string()));
        assert_eq!(defaults.scheme, Some("https".to_string()));

        // File order is preserved; it drives category ordering
        let patterns = config.patterns.unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].name, "/admin/");
        assert_eq!(patterns[1].name, "/graphql/");
    }

    #[test]
    fn test_invalid_concurrency() {
        let config_content = r#"
[defaults]
concurrency = 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let config_content = r#"
[defaults]
timeout = "fast"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_duplicate_pattern_names_rejected() {
        let config_content = r#"
[[patterns]]
name = "/api/"
marker = "/api/"

[[patterns]]
name = "/api/"
marker = "/apiv2/"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(10),
                proxy: Some("http://lower:8080".to_string()),
                ..Default::default()
            }),
            patterns: Some(vec![PatternRule::new("/a/", "/a/")]),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                ..Default::default()
            }),
            patterns: None,
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();

        assert_eq!(defaults.concurrency, Some(25)); // Higher wins
        assert_eq!(defaults.proxy, Some("http://lower:8080".to_string())); // Lower preserved
        assert_eq!(merged.patterns.unwrap().len(), 1); // Lower's patterns kept
    }

    #[test]
    fn test_empty_pattern_list_rejected() {
        let config_content = "patterns = []\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let manager = ConfigManager::new(false);
        assert!(manager.load_file(temp_file.path()).is_err());
    }
}
