//! Error types for the reachability pipeline.

use thiserror::Error;

/// Error raised by a [`tsb_model::TsbApi`] implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while generating reachability policy.
///
/// Every variant is fatal for the run; no partial output is produced.
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching the topology failed.
    #[error("failed to get server topology: {0}")]
    Topology(#[source] BoxError),

    /// Fetching the service list failed.
    #[error("failed to get service list: {0}")]
    Services(#[source] BoxError),

    /// Looking up the traffic group of a calling service failed.
    #[error("failed to look up traffic group for {service:?}: {source}")]
    TrafficGroupLookup {
        /// FQN of the calling service.
        service: String,
        /// Underlying API error.
        #[source]
        source: BoxError,
    },

    /// Fetching the existing traffic setting of a group failed.
    #[error("failed to get traffic settings for {group:?}: {source}")]
    TrafficSettingFetch {
        /// FQN of the traffic group.
        group: String,
        /// Underlying API error.
        #[source]
        source: BoxError,
    },

    /// A policy spec could not be serialized.
    #[error("failed to serialize {kind} spec: {source}")]
    Spec {
        /// Kind of the object being packaged.
        kind: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Unknown or unsupported output format.
    #[error("unknown output format: {0}. Use 'yaml' or 'json'.")]
    UnknownFormat(String),

    /// YAML rendering error.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// JSON rendering error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
