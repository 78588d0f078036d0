//! Repository totals returned by the REST API.

use serde::Deserialize;

/// The subset of `GET /repos/{owner}/{repo}` used for enrichment.
///
/// Each count is optional so a missing or null field defaults to zero on
/// its own without failing the whole lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepoTotals {
    /// Total stargazers.
    pub stargazers_count: Option<u64>,

    /// Total forks.
    pub forks_count: Option<u64>,
}

impl RepoTotals {
    /// Creates totals with both counts present.
    pub fn new(stargazers_count: u64, forks_count: u64) -> Self {
        Self {
            stargazers_count: Some(stargazers_count),
            forks_count: Some(forks_count),
        }
    }
}
