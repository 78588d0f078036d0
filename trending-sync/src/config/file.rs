//! Config file deserialization.

use crate::destination::FieldNames;
use crate::listing::SelectorConfig;
use serde::Deserialize;

/// Parsed contents of a `trending-sync.toml` file.
///
/// Every key is optional; missing keys fall back to the built-in defaults.
/// Credentials are not read from the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Trending page to scrape.
    pub listing_url: Option<String>,

    /// Base URL of the GitHub REST API.
    pub api_base_url: Option<String>,

    /// User-Agent sent with the listing request.
    pub user_agent: Option<String>,

    /// Number of listing entries kept for enrichment.
    pub limit: Option<usize>,

    /// Maximum concurrent enrichment requests.
    pub concurrency: Option<usize>,

    /// Timeout for the listing request, in seconds.
    pub listing_timeout_secs: Option<u64>,

    /// Timeout for each enrichment request, in seconds.
    pub lookup_timeout_secs: Option<u64>,

    /// Handlebars template for the recommendation reason.
    pub reason_template: Option<String>,

    /// Listing markup selectors.
    pub selectors: SelectorConfig,

    /// Feishu Bitable settings.
    pub bitable: BitableSection,
}

/// `[bitable]` table of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BitableSection {
    /// Base URL of the Feishu Open API.
    pub base_url: Option<String>,

    /// Timeout for Bitable requests, in seconds.
    pub timeout_secs: Option<u64>,

    /// Target column names.
    pub fields: FieldNames,
}
