//! Markup extraction for the trending listing.

use super::{CandidateEntry, ListingSelectors};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::debug;

static STARS_TODAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d[\d,]*)\s+stars\s+today").expect("Invalid stars today regex")
});

/// Parses listing documents into [`CandidateEntry`] values.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    selectors: ListingSelectors,
    site: String,
}

impl ListingExtractor {
    /// Creates an extractor.
    ///
    /// `site` is the origin repository URLs are built on, usually the
    /// origin of the listing URL.
    pub fn new(selectors: ListingSelectors, site: impl Into<String>) -> Self {
        Self {
            selectors,
            site: site.into(),
        }
    }

    /// Extracts every well-formed listing block, in document order.
    ///
    /// Blocks without a valid "owner/name" title are skipped and do not
    /// consume a rank.
    pub fn extract(&self, document: &str) -> Vec<CandidateEntry> {
        let html = Html::parse_document(document);
        let mut entries = Vec::new();

        for (index, block) in html.select(&self.selectors.block).enumerate() {
            let Some((owner, name)) = self.title(block) else {
                debug!(block = index, "Skipping listing block without a valid title");
                continue;
            };

            let rank = entries.len() as u32 + 1;
            entries.push(CandidateEntry::new(
                rank,
                owner,
                name,
                self.description(block),
                self.language(block),
                self.stars_today(block),
                &self.site,
            ));
        }

        debug!(count = entries.len(), "Extracted listing entries");
        entries
    }

    fn title(&self, block: ElementRef<'_>) -> Option<(String, String)> {
        let element = block.select(&self.selectors.title).next()?;
        split_title(&element.text().collect::<String>())
    }

    fn description(&self, block: ElementRef<'_>) -> String {
        first_text(block, &self.selectors.description)
    }

    fn language(&self, block: ElementRef<'_>) -> String {
        first_text(block, &self.selectors.language)
    }

    fn stars_today(&self, block: ElementRef<'_>) -> u64 {
        block
            .select(&self.selectors.badge)
            .find_map(|badge| parse_stars_today(&badge.text().collect::<String>()))
            .unwrap_or(0)
    }
}

fn first_text(block: ElementRef<'_>, selector: &scraper::Selector) -> String {
    block
        .select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Splits a listing title such as `"rust-lang /\n  rust"` into owner and name.
///
/// All whitespace is removed first. The result must contain exactly one `/`,
/// and both parts must be valid GitHub names, since they end up in API
/// routes and repository links.
pub fn split_title(raw: &str) -> Option<(String, String)> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let (owner, name) = compact.split_once('/')?;

    if !is_valid_segment(owner) || !is_valid_segment(name) {
        return None;
    }

    Some((owner.to_string(), name.to_string()))
}

/// GitHub owner and repository names use `[A-Za-z0-9._-]` only.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Parses the number out of a "1,234 stars today" badge.
///
/// Returns `None` when the text does not match or the number does not fit.
pub fn parse_stars_today(text: &str) -> Option<u64> {
    let captures = STARS_TODAY_REGEX.captures(text)?;
    captures[1].replace(',', "").parse().ok()
}
