//! Error types for model validation.

use thiserror::Error;

/// Errors that can occur while building model values from user input.
#[derive(Debug, Error)]
pub enum Error {
    /// A date did not match `YYYY-MM-DD`.
    #[error("failed to parse {field} time {input:?}: {source}")]
    InvalidDate {
        /// Which end of the window was being parsed.
        field: &'static str,
        /// The rejected input.
        input: String,
        /// Underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },

    /// The window ends before it starts.
    #[error("start date {start} is after end date {end}")]
    InvertedWindow {
        /// Window start.
        start: chrono::NaiveDate,
        /// Window end.
        end: chrono::NaiveDate,
    },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, Error>;
