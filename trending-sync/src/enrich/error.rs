//! Enrichment error types.

use std::time::Duration;
use thiserror::Error;

/// Errors from a single repository lookup.
///
/// These never abort a run; the affected entry keeps its placeholder totals.
#[derive(Debug, Error)]
pub enum LookupError {
    /// GitHub API error (transport, non-success status or undecodable body).
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// The lookup did not finish in time.
    #[error("Lookup timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}
