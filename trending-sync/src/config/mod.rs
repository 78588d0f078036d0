//! Pipeline configuration.
//!
//! Settings are read from an optional TOML file, validated, and threaded
//! explicitly into the components that need them. Secrets are supplied by
//! the caller (usually from the environment) and never read from the file.

mod error;
mod file;

pub use error::ConfigError;
pub use file::{BitableSection, ConfigFile};

use crate::listing::{ListingSelectors, SelectorConfig};
use crate::records::ReasonRenderer;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default trending page (daily window, all languages).
pub const DEFAULT_LISTING_URL: &str = "https://github.com/trending?since=daily";

/// Default GitHub REST API base.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default User-Agent for the listing request.
pub const DEFAULT_USER_AGENT: &str = "github-trending-to-feishu";

/// Default number of entries kept for enrichment.
pub const DEFAULT_LIMIT: usize = 10;

/// Default maximum concurrent enrichment requests.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default listing request timeout.
pub const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 30;

/// Default per-entry enrichment timeout.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

/// Default recommendation reason template.
pub const DEFAULT_REASON_TEMPLATE: &str = "GitHub Trending 今日第 {{rank}} 名，今日新增 Star {{stars_today}}，总 Star {{total_stars}}，Fork 数 {{forks}}。";

/// Configuration for one pipeline run.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Trending page to scrape.
    listing_url: Url,
    /// Base URL of the GitHub REST API.
    api_base_url: Url,
    /// User-Agent sent with the listing request.
    user_agent: String,
    /// Optional GitHub token for enrichment requests.
    github_token: Option<String>,
    /// Number of listing entries kept for enrichment.
    limit: usize,
    /// Maximum concurrent enrichment requests.
    concurrency: usize,
    /// Timeout for the listing request.
    listing_timeout: Duration,
    /// Timeout for each enrichment request.
    lookup_timeout: Duration,
    /// Handlebars template for the recommendation reason.
    reason_template: String,
    /// Listing markup selectors.
    selectors: SelectorConfig,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("listing_url", &self.listing_url.as_str())
            .field("api_base_url", &self.api_base_url.as_str())
            .field("user_agent", &self.user_agent)
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .field("limit", &self.limit)
            .field("concurrency", &self.concurrency)
            .field("listing_timeout", &self.listing_timeout)
            .field("lookup_timeout", &self.lookup_timeout)
            .field("reason_template", &self.reason_template)
            .field("selectors", &self.selectors)
            .finish()
    }
}

impl PipelineConfig {
    /// Builds a validated configuration from a parsed config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a URL, number, template or selector is invalid.
    pub fn from_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let config = Self {
            listing_url: parse_url(
                "listing-url",
                file.listing_url.as_deref().unwrap_or(DEFAULT_LISTING_URL),
            )?,
            api_base_url: parse_url(
                "api-base-url",
                file.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL),
            )?,
            user_agent: file
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            github_token: None,
            limit: file.limit.unwrap_or(DEFAULT_LIMIT),
            concurrency: file.concurrency.unwrap_or(DEFAULT_CONCURRENCY),
            listing_timeout: Duration::from_secs(
                file.listing_timeout_secs
                    .unwrap_or(DEFAULT_LISTING_TIMEOUT_SECS),
            ),
            lookup_timeout: Duration::from_secs(
                file.lookup_timeout_secs
                    .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS),
            ),
            reason_template: file
                .reason_template
                .clone()
                .unwrap_or_else(|| DEFAULT_REASON_TEMPLATE.to_string()),
            selectors: file.selectors.clone(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file(&load_config_file(path)?)
    }

    /// Sets the GitHub token used for enrichment requests.
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Sets the number of entries kept for enrichment.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the maximum concurrent enrichment requests.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the trending page URL.
    pub fn with_listing_url(mut self, listing_url: Url) -> Self {
        self.listing_url = listing_url;
        self
    }

    /// Sets the GitHub REST API base URL.
    pub fn with_api_base_url(mut self, api_base_url: Url) -> Self {
        self.api_base_url = api_base_url;
        self
    }

    /// Sets the per-entry enrichment timeout.
    pub fn with_lookup_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// Returns the trending page URL.
    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }

    /// Returns the GitHub REST API base URL.
    pub fn api_base_url(&self) -> &Url {
        &self.api_base_url
    }

    /// Returns the listing User-Agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the GitHub token, if any.
    pub fn github_token(&self) -> Option<&str> {
        self.github_token.as_deref()
    }

    /// Returns the number of entries kept for enrichment.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the max concurrent enrichment requests.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the listing request timeout.
    pub fn listing_timeout(&self) -> Duration {
        self.listing_timeout
    }

    /// Returns the per-entry enrichment timeout.
    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Returns the recommendation reason template.
    pub fn reason_template(&self) -> &str {
        &self.reason_template
    }

    /// Returns the listing selector strings.
    pub fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }

    /// Checks every value, including the ones set through `with_*`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_scheme("listing-url", &self.listing_url)?;
        check_http_scheme("api-base-url", &self.api_base_url)?;

        if self.user_agent.trim().is_empty() {
            return Err(invalid("user-agent", "must not be empty"));
        }

        if self.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1"));
        }

        if self.listing_timeout.is_zero() {
            return Err(invalid("listing-timeout-secs", "must be greater than 0"));
        }

        if self.lookup_timeout.is_zero() {
            return Err(invalid("lookup-timeout-secs", "must be greater than 0"));
        }

        if self.reason_template.trim().is_empty() {
            return Err(invalid("reason-template", "must not be empty"));
        }

        ReasonRenderer::check(&self.reason_template)
            .map_err(|e| invalid("reason-template", &e.to_string()))?;

        ListingSelectors::from_config(&self.selectors)?;
        Ok(())
    }
}

/// Reads and parses a config file without validating it.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or is not valid TOML.
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    info!(path = %path.display(), "Loading config file");

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;

    debug!(?file, "Parsed config file");
    Ok(file)
}

/// Parses a URL value, naming the key on failure.
pub(crate) fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| invalid(field, &format!("not a valid URL ({e}): {value}")))?;
    check_http_scheme(field, &url)?;
    Ok(url)
}

fn check_http_scheme(field: &str, url: &Url) -> Result<(), ConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(field, &format!("unsupported scheme '{other}'"))),
    }
}

pub(crate) fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}
