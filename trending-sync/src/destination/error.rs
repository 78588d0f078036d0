//! Destination error types.

use thiserror::Error;

/// Errors that can occur while writing records to the destination.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build destination HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or timed out.
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success HTTP status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API reported an application-level error.
    #[error("{endpoint} failed with code {code}: {msg}")]
    Api {
        endpoint: String,
        code: i64,
        msg: String,
    },

    /// The token endpoint succeeded without returning a token.
    #[error("Token response did not contain tenant_access_token")]
    MissingToken,
}
