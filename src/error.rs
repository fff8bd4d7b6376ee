//! Error types for catalog access and report generation.

use thiserror::Error;

/// Main error type for all wrapped operations.
#[derive(Debug, Error)]
pub enum WrappedError {
    /// Server rejected the username / password token.
    #[error("Bad credentials: {0}")]
    BadCredentials(String),

    /// Server URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The first album page could not be fetched, so the catalog state is unknown.
    #[error("Catalog unreachable: {0}")]
    CatalogUnreachable(String),

    /// A later album page failed; the walk stops instead of truncating totals.
    #[error("Album page at offset {offset} failed: {reason}")]
    PageFetchFailed {
        /// Offset of the page that failed.
        offset: u32,
        /// Underlying failure.
        reason: String,
    },

    /// No data returned from API.
    #[error("No data from API: {0}")]
    NoDataApi(String),

    /// HTTP request failed.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    /// I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Subsonic API returned a failed status.
    #[error("API error: {0}")]
    ApiError(String),
}

/// Result type alias for wrapped operations.
pub type Result<T> = std::result::Result<T, WrappedError>;
