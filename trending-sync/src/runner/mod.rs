//! Orchestrates a trending sync run.

mod error;

pub use error::RunnerError;

use crate::config::PipelineConfig;
use crate::destination::RecordSink;
use crate::enrich::{enrich, GitHubLookup, RepoLookup};
use crate::limit::limit;
use crate::listing::{site_origin, ListingClient, ListingExtractor, ListingSelectors};
use crate::records::{OutputRecord, RecordAssembler};
use crate::summary::RunSummary;
use std::sync::Arc;
use tracing::{info, warn};

/// Records produced by a run, with its summary.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Assembled records in rank order.
    pub records: Vec<OutputRecord>,

    /// Counters for the run.
    pub summary: RunSummary,
}

/// Runs the fetch, extract, limit, enrich and assemble stages.
pub struct Runner {
    config: PipelineConfig,
    listing: ListingClient,
    extractor: ListingExtractor,
    lookup: Arc<dyn RepoLookup>,
    assembler: RecordAssembler,
}

impl Runner {
    /// Builds a runner that enriches through the GitHub REST API.
    pub fn new(config: PipelineConfig) -> Result<Self, RunnerError> {
        let lookup = GitHubLookup::new(config.api_base_url(), config.github_token())?;
        Self::with_lookup(config, Arc::new(lookup))
    }

    /// Builds a runner with a custom repository lookup.
    pub fn with_lookup(
        config: PipelineConfig,
        lookup: Arc<dyn RepoLookup>,
    ) -> Result<Self, RunnerError> {
        config.validate()?;

        let listing = ListingClient::new(
            config.listing_url().clone(),
            config.user_agent(),
            config.listing_timeout(),
        )?;
        let selectors = ListingSelectors::from_config(config.selectors())?;
        let extractor = ListingExtractor::new(selectors, site_origin(config.listing_url()));
        let assembler = RecordAssembler::new(config.reason_template())?;

        Ok(Self {
            config,
            listing,
            extractor,
            lookup,
            assembler,
        })
    }

    /// Produces the records without writing them anywhere.
    pub async fn collect(&self) -> Result<RunOutput, RunnerError> {
        self.collect_with(RunSummary::new(true)).await
    }

    /// Produces the records and writes them to `sink`.
    ///
    /// The sink is not called when there are no records.
    pub async fn run(&self, sink: &dyn RecordSink) -> Result<RunOutput, RunnerError> {
        let mut output = self.collect_with(RunSummary::new(false)).await?;

        if output.records.is_empty() {
            warn!(sink = sink.name(), "No trending records, skipping write");
            output.summary.write_skipped = true;
            return Ok(output);
        }

        info!(sink = sink.name(), count = output.records.len(), "Writing records");
        output.summary.written = sink.write(&output.records).await?;
        Ok(output)
    }

    async fn collect_with(&self, mut summary: RunSummary) -> Result<RunOutput, RunnerError> {
        info!(url = %self.listing.url(), "Starting trending sync");

        let document = self.listing.fetch().await?;
        let entries = self.extractor.extract(&document);
        summary.listed = entries.len();
        info!(count = entries.len(), "Parsed trending repositories");

        let entries = limit(entries, self.config.limit());
        summary.retained = entries.len();

        let report = enrich(
            self.lookup.as_ref(),
            entries,
            self.config.concurrency(),
            self.config.lookup_timeout(),
        )
        .await;
        summary.record_enrichment(&report);

        let records = self.assembler.assemble_all(&report.entries)?;
        Ok(RunOutput { records, summary })
    }
}
