//! Repository lookup against the GitHub REST API.

use super::{LookupError, RepoTotals};
use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use tracing::debug;
use url::Url;

/// Fetches repository totals by owner and name.
#[async_trait]
pub trait RepoLookup: Send + Sync {
    /// Looks up the totals for `owner/name`.
    async fn lookup(&self, owner: &str, name: &str) -> Result<RepoTotals, LookupError>;
}

/// [`RepoLookup`] backed by octocrab.
#[derive(Clone)]
pub struct GitHubLookup {
    octocrab: Octocrab,
}

impl GitHubLookup {
    /// Builds a client for `api_base`, authenticated when `token` is set.
    ///
    /// Unauthenticated clients work too, at GitHub's lower anonymous rate limit.
    /// octocrab's built-in retries are disabled: each entry gets one attempt.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is rejected or the client cannot be built.
    pub fn new(api_base: &Url, token: Option<&str>) -> Result<Self, octocrab::Error> {
        let mut builder = Octocrab::builder()
            .base_uri(api_base.as_str())?
            .add_retry_config(RetryConfig::None);
        if let Some(token) = token {
            builder = builder.personal_token(token.to_string());
        }

        Ok(Self::from_octocrab(builder.build()?))
    }

    /// Wraps an existing octocrab client.
    pub fn from_octocrab(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

#[async_trait]
impl RepoLookup for GitHubLookup {
    async fn lookup(&self, owner: &str, name: &str) -> Result<RepoTotals, LookupError> {
        let route = format!("/repos/{owner}/{name}");
        debug!(route = %route, "Fetching repository totals");

        let totals: RepoTotals = self.octocrab.get(&route, None::<&()>).await?;
        Ok(totals)
    }
}
