//! Run summary types.

use crate::enrich::{EnrichmentFailure, EnrichmentReport};
use serde::Serialize;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Number of entries parsed from the listing.
    pub listed: usize,

    /// Number of entries kept after the limit.
    pub retained: usize,

    /// Number of entries whose totals were fetched.
    pub enriched: usize,

    /// Lookups that failed; those entries kept zero totals.
    pub enrichment_failures: Vec<EnrichmentFailure>,

    /// Number of records the destination stored.
    pub written: usize,

    /// Whether the destination was skipped because there was nothing to write.
    pub write_skipped: bool,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with the outcome of enrichment.
    pub fn record_enrichment(&mut self, report: &EnrichmentReport) {
        self.enriched += report.entries.len() - report.failures.len();
        self.enrichment_failures
            .extend(report.failures.iter().cloned());
    }

    /// Returns true if any lookup failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.enrichment_failures.is_empty()
    }

    /// Returns true if every retained entry was enriched.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.enrichment_failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::CandidateEntry;

    #[test]
    fn can_record_enrichment() {
        let entry = CandidateEntry::new(1, "a", "b", "", "", 0, "https://github.com");
        let report = EnrichmentReport {
            entries: vec![entry.clone(), entry],
            failures: vec![EnrichmentFailure {
                rank: 2,
                repository: "a/b".to_string(),
                error: "boom".to_string(),
            }],
        };

        let mut summary = RunSummary::new(false);
        summary.record_enrichment(&report);

        assert_eq!(summary.enriched, 1);
        assert_eq!(summary.enrichment_failures.len(), 1);
        assert!(summary.has_failures());
        assert!(!summary.all_success());
    }

    #[test]
    fn empty_summary_is_success() {
        let summary = RunSummary::new(true);
        assert!(summary.all_success());
        assert!(summary.dry_run);
    }
}
