//! CSS selectors describing the listing markup.
//!
//! Every selector string the extractor relies on lives here, so a change in
//! the page structure only touches this adapter (or the config file).

use crate::config::ConfigError;
use scraper::Selector;
use serde::Deserialize;

/// Raw selector strings, as read from the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// One element per trending repository.
    pub block: String,

    /// Element holding the "owner / name" title, searched inside a block.
    pub title: String,

    /// Description paragraph; the first match is used.
    pub description: String,

    /// Primary language tag.
    pub language: String,

    /// Inline badges scanned for the "N stars today" text.
    pub badge: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            block: "article".to_string(),
            title: "h2 a".to_string(),
            description: "p".to_string(),
            language: r#"[itemprop="programmingLanguage"]"#.to_string(),
            badge: "span".to_string(),
        }
    }
}

/// Compiled selectors used by [`ListingExtractor`](super::ListingExtractor).
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    pub(crate) block: Selector,
    pub(crate) title: Selector,
    pub(crate) description: Selector,
    pub(crate) language: Selector,
    pub(crate) badge: Selector,
}

impl ListingSelectors {
    /// Compiles the given selector strings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSelector`] naming the first selector
    /// that fails to parse.
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            block: compile("block", &config.block)?,
            title: compile("title", &config.title)?,
            description: compile("description", &config.description)?,
            language: compile("language", &config.language)?,
            badge: compile("badge", &config.badge)?,
        })
    }
}

fn compile(field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field: field.to_string(),
        selector: selector.to_string(),
        message: format!("{e:?}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selectors_compile() {
        assert!(ListingSelectors::from_config(&SelectorConfig::default()).is_ok());
    }

    #[test]
    fn invalid_selector_names_the_field() {
        let config = SelectorConfig {
            title: "h2 >>> a[".to_string(),
            ..SelectorConfig::default()
        };

        match ListingSelectors::from_config(&config) {
            Err(ConfigError::InvalidSelector { field, .. }) => assert_eq!(field, "title"),
            other => panic!("expected invalid selector error, got {other:?}"),
        }
    }
}
