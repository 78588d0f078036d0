#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod destination;
pub mod enrich;
pub mod limit;
pub mod listing;
pub mod records;
pub mod runner;
pub mod summary;

pub use config::{load_config_file, BitableSection, ConfigError, ConfigFile, PipelineConfig};
pub use destination::{BitableConfig, BitableSink, DestinationError, FieldNames, RecordSink};
pub use enrich::{
    enrich, merge, EnrichmentFailure, EnrichmentReport, GitHubLookup, LookupError, RepoLookup,
    RepoTotals,
};
pub use limit::limit;
pub use listing::{
    parse_stars_today, split_title, CandidateEntry, FetchError, ListingClient, ListingExtractor,
    ListingSelectors, SelectorConfig,
};
pub use records::{OutputRecord, RecordAssembler, RecordLink, TemplateError};
pub use runner::{RunOutput, Runner, RunnerError};
pub use summary::RunSummary;
