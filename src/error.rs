//! Error types for the research stream transport.

use thiserror::Error;

/// Transport error type.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid backend URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Research backend answered with a non-success status.
    #[error("Backend error ({status}): {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// No bytes arrived within the idle timeout.
    #[error("No data from backend for {0:?}")]
    IdleTimeout(std::time::Duration),

    /// Stream closed before the `end` event.
    #[error("Stream ended unexpectedly")]
    StreamEnded,
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, Error>;
