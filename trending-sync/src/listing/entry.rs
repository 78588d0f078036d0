//! Candidate entry parsed from a listing block.

use serde::Serialize;

/// One trending repository as parsed from the listing, before and after enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEntry {
    /// 1-based position among the successfully parsed listing blocks.
    pub rank: u32,

    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,

    /// Full repository name in "owner/name" format.
    pub full_name: String,

    /// Short description, empty when the listing has none.
    pub description: String,

    /// Primary language, empty when the listing does not tag one.
    pub language: String,

    /// Stars gained today according to the listing badge.
    pub stars_today: u64,

    /// Total stargazers. Zero until enrichment succeeds.
    pub total_stars: u64,

    /// Fork count. Zero until enrichment succeeds.
    pub forks: u64,

    /// Canonical web URL of the repository.
    pub repo_url: String,
}

impl CandidateEntry {
    /// Creates an entry with zeroed totals.
    ///
    /// `site` is the origin the repository URL is built on
    /// (e.g. `https://github.com`).
    pub fn new(
        rank: u32,
        owner: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        language: impl Into<String>,
        stars_today: u64,
        site: &str,
    ) -> Self {
        let owner = owner.into();
        let name = name.into();
        let full_name = format!("{owner}/{name}");
        let repo_url = format!("{}/{full_name}", site.trim_end_matches('/'));

        Self {
            rank,
            owner,
            name,
            full_name,
            description: description.into(),
            language: language.into(),
            stars_today,
            total_stars: 0,
            forks: 0,
            repo_url,
        }
    }
}
