//! Metadata enrichment.
//!
//! Each candidate entry is looked up independently and its totals are merged
//! in. A failed lookup leaves the entry's placeholders untouched and is
//! reported, never propagated.

mod error;
mod lookup;
mod totals;

pub use error::LookupError;
pub use lookup::{GitHubLookup, RepoLookup};
pub use totals::RepoTotals;

use crate::listing::CandidateEntry;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, info_span, warn, Instrument};

/// A lookup that failed for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichmentFailure {
    /// Rank of the affected entry.
    pub rank: u32,

    /// Repository full name.
    pub repository: String,

    /// Error message.
    pub error: String,
}

/// Result of enriching a sequence of entries.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentReport {
    /// Entries in their original order.
    pub entries: Vec<CandidateEntry>,

    /// Failed lookups, in entry order.
    pub failures: Vec<EnrichmentFailure>,
}

/// Merges a lookup result into an entry.
///
/// On success both totals are overwritten, each defaulting to zero when the
/// API omitted it. On failure the entry is returned unchanged.
#[must_use]
pub fn merge(
    mut entry: CandidateEntry,
    result: &Result<RepoTotals, LookupError>,
) -> CandidateEntry {
    if let Ok(totals) = result {
        entry.total_stars = totals.stargazers_count.unwrap_or(0);
        entry.forks = totals.forks_count.unwrap_or(0);
    }
    entry
}

/// Enriches `entries` with repository totals.
///
/// At most `concurrency` lookups run at once and each is bounded by
/// `timeout`. The returned entries keep the input order.
pub async fn enrich(
    lookup: &dyn RepoLookup,
    entries: Vec<CandidateEntry>,
    concurrency: usize,
    timeout: Duration,
) -> EnrichmentReport {
    let span = info_span!("enrich", count = entries.len());

    async {
        info!("Enriching entries");

        let mut slots: Vec<Option<(CandidateEntry, Option<EnrichmentFailure>)>> =
            (0..entries.len()).map(|_| None).collect();

        let mut results = stream::iter(entries.into_iter().enumerate())
            .map(|(index, entry)| async move {
                let result = lookup_with_timeout(lookup, &entry, timeout).await;
                (index, entry, result)
            })
            .buffer_unordered(concurrency.max(1));

        while let Some((index, entry, result)) = results.next().await {
            let failure = match &result {
                Ok(totals) => {
                    debug!(rank = entry.rank, repo = %entry.full_name, ?totals, "Enriched entry");
                    None
                }
                Err(e) => {
                    warn!(
                        rank = entry.rank,
                        repo = %entry.full_name,
                        error = %e,
                        "Failed to fetch repository totals, keeping zeros"
                    );
                    Some(EnrichmentFailure {
                        rank: entry.rank,
                        repository: entry.full_name.clone(),
                        error: e.to_string(),
                    })
                }
            };
            slots[index] = Some((merge(entry, &result), failure));
        }

        let mut report = EnrichmentReport::default();
        for (entry, failure) in slots.into_iter().flatten() {
            report.entries.push(entry);
            report.failures.extend(failure);
        }

        info!(
            enriched = report.entries.len() - report.failures.len(),
            failed = report.failures.len(),
            "Enrichment complete"
        );
        report
    }
    .instrument(span)
    .await
}

async fn lookup_with_timeout(
    lookup: &dyn RepoLookup,
    entry: &CandidateEntry,
    timeout: Duration,
) -> Result<RepoTotals, LookupError> {
    tokio::time::timeout(timeout, lookup.lookup(&entry.owner, &entry.name))
        .await
        .map_err(|_| LookupError::TimedOut(timeout))?
}
