//! Output record shape handed to the destination.

use serde::Serialize;

/// A link cell pairing display text with its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordLink {
    /// Text shown in the cell.
    pub text: String,

    /// URL the cell points to.
    pub link: String,
}

/// Final, normalized record for one trending repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub rank: u32,

    /// Full repository name ("owner/name").
    pub title: String,

    pub description: String,

    /// Human-readable recommendation reason.
    pub reason: String,

    /// Repository owner.
    pub author: String,

    pub link: RecordLink,

    /// Primary language, possibly empty.
    pub language: String,

    pub stars_today: u64,
    pub total_stars: u64,
    pub forks: u64,
}
