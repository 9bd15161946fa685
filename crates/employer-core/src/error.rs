//! Error types for screen operations.
//!
//! This module defines [`ScreenError`] which covers every failure that can occur
//! while fetching ranking pages, looking up tickers, fetching metrics, or writing
//! the report.

use thiserror::Error;

/// Errors that can occur during screen operations.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// A non-success HTTP status was returned.
    #[error("HTTP {status} for {url}")]
    Http {
        /// Numeric status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A metrics response arrived without a display name.
    #[error("Minimal info (Name) not received for {0}")]
    MissingName(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error writing the report.
    #[error("Export error: {0}")]
    Export(String),

    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`ScreenError`].
pub type Result<T> = std::result::Result<T, ScreenError>;
