//! Error types and handling for cardex-core operations.
//!
//! Errors are grouped by the stage of the pipeline that produced them so that
//! callers can decide how far a failure should propagate:
//!
//! - **Network Errors**: timeouts, connection failures, non-2xx responses
//! - **Parse Errors**: expected document structure was absent
//! - **Cache Errors**: the persisted card cache is malformed or unreadable
//! - **Configuration Errors**: the pack list is missing or a config file is invalid
//!
//! Per-fragment and per-pack failures are logged and skipped by the extractor;
//! only crawler, pack-list and cache failures abort a whole acquisition.
//!
//! ```rust
//! use cardex_core::Error;
//!
//! let err = Error::Parse("fragment has no card name".to_string());
//! assert_eq!(err.category(), "parse");
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for cardex-core operations.
///
/// All fallible public functions in cardex-core return `Result<T, Error>`.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Covers connection failures, request timeouts and non-2xx statuses
    /// (mapped through `error_for_status`). The underlying `reqwest::Error`
    /// is preserved for detailed connection information.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Expected document structure was absent.
    ///
    /// ## Common Causes
    ///
    /// - A card fragment without any recognizable name node
    /// - A selector that failed to compile
    #[error("Parse error: {0}")]
    Parse(String),

    /// The persisted card cache could not be read or decoded.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration is invalid or a required input file is missing.
    ///
    /// ## Common Causes
    ///
    /// - Pack-list file absent when extraction starts
    /// - Invalid TOML syntax in the config file
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL is malformed or cannot be resolved against its base.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A single-flight operation is already running.
    #[error("Busy: {0}")]
    Busy(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Check if the error is transient in nature.
    ///
    /// Nothing in cardex retries automatically; this only lets callers word
    /// their diagnostics (for example "check your connection" vs "fix the file").
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Busy(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Cache(_) => "cache",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Busy(_) => "busy",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
