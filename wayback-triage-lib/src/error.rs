//! Error handling for triage operations.
//!
//! This module defines the library error type covering the ways a triage run
//! can fail. Per-domain lookup and probe failures are deliberately *not*
//! errors: they are recorded as result values so one bad domain never aborts
//! a batch. The variants here cover fatal startup problems (input, config)
//! and provider-internal failures that get converted into recorded values at
//! the pipeline boundary.

use std::fmt;

/// Main error type for triage operations.
#[derive(Debug, Clone)]
pub enum TriageError {
    /// Malformed or missing input source (fatal, pre-dispatch)
    InputError { message: String },

    /// Invalid configuration: bad proxy URL, bad pattern set, bad flag
    /// combination (fatal at startup)
    ConfigError { message: String },

    /// File I/O errors when reading domain lists or config files
    FileError { path: String, message: String },

    /// Network-related errors (connection, DNS, TLS)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// Archive lookup failures (CDX query or subprocess)
    LookupError { domain: String, message: String },

    /// Liveness probe failures
    ProbeError { domain: String, message: String },

    /// Timeout errors when an external call exceeds its deadline
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl TriageError {
    /// Create a new input error.
    pub fn input<M: Into<String>>(message: M) -> Self {
        Self::InputError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new lookup error.
    pub fn lookup<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::LookupError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new probe error.
    pub fn probe<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::ProbeError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error is fatal at startup (aborts before any worker is
    /// dispatched) rather than a per-domain condition.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InputError { .. } | Self::ConfigError { .. } | Self::FileError { .. }
        )
    }
}

impl fmt::Display for TriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputError { message } => {
                write!(f, "Input error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::LookupError { domain, message } => {
                write!(f, "Archive lookup error for '{}': {}", domain, message)
            }
            Self::ProbeError { domain, message } => {
                write!(f, "Probe error for '{}': {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TriageError {}

// Implement From conversions for common error types
impl From<reqwest::Error> for TriageError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(30))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<std::io::Error> for TriageError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

impl From<toml::de::Error> for TriageError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}
