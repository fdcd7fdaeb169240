//! Error types for TSB API operations.

use thiserror::Error;

/// Errors that can occur while talking to the TSB API.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection parameters are missing or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The server answered with a non-success status.
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
        /// Response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// What was being decoded.
        what: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The GraphQL endpoint reported errors.
    #[error("graphql query failed: {0}")]
    GraphQl(String),

    /// Network error.
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Result type alias for TSB API operations.
pub type Result<T> = std::result::Result<T, Error>;
