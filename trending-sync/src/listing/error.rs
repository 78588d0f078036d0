//! Listing fetch error types.

use thiserror::Error;

/// Errors that can occur while fetching the listing document.
///
/// All of these are fatal to a run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build listing HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or timed out.
    #[error("Failed to fetch listing '{url}': {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The listing answered with a non-success status.
    #[error("Listing '{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read.
    #[error("Failed to read listing body from '{url}': {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
