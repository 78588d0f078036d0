//! Trending listing fetch and extraction.
//!
//! This module downloads the trending page and turns its repository blocks
//! into [`CandidateEntry`] values. Fetch failures are fatal; malformed blocks
//! are skipped.

mod entry;
mod error;
mod extractor;
mod selectors;

pub use entry::CandidateEntry;
pub use error::FetchError;
pub use extractor::{parse_stars_today, split_title, ListingExtractor};
pub use selectors::{ListingSelectors, SelectorConfig};

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, info_span, Instrument};
use url::Url;

/// HTTP client for the listing page.
#[derive(Debug, Clone)]
pub struct ListingClient {
    client: Client,
    url: Url,
}

impl ListingClient {
    /// Builds a client that sends `user_agent` and gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built.
    pub fn new(url: Url, user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, url })
    }

    /// Returns the listing URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Downloads the listing document.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failures, timeouts and
    /// non-success statuses.
    pub async fn fetch(&self) -> Result<String, FetchError> {
        let span = info_span!("fetch_listing", url = %self.url);

        async {
            info!("Fetching trending listing");
            let url = self.url.to_string();

            let response = self
                .client
                .get(self.url.clone())
                .send()
                .await
                .map_err(|source| FetchError::Request {
                    url: url.clone(),
                    source,
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url,
                    status: status.as_u16(),
                });
            }

            let body = response
                .text()
                .await
                .map_err(|source| FetchError::Body { url, source })?;

            debug!(bytes = body.len(), "Listing downloaded");
            Ok(body)
        }
        .instrument(span)
        .await
    }
}

/// Returns the origin of `url` (scheme, host and port) for building
/// repository links.
pub fn site_origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}
