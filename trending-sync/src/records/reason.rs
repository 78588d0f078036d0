//! Recommendation reason rendering.

use super::TemplateError;
use crate::listing::CandidateEntry;
use handlebars::{no_escape, Handlebars};
use serde_json::json;

const REASON_TEMPLATE_NAME: &str = "reason";

/// Creates a Handlebars registry for plain-text output.
///
/// The registry is configured with:
/// - No HTML escaping (reasons are plain text)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders the recommendation reason for an entry.
///
/// The template is compiled once. Available variables: `rank`, `owner`,
/// `name`, `full_name`, `language`, `stars_today`, `total_stars`, `forks`.
pub struct ReasonRenderer {
    handlebars: Handlebars<'static>,
}

impl ReasonRenderer {
    /// Compiles `template` and renders it once against a sample entry, so
    /// unknown variables are reported before any network work happens.
    ///
    /// # Errors
    ///
    /// Returns the [`TemplateError`] from compiling or rendering.
    pub fn check(template: &str) -> Result<(), TemplateError> {
        let sample = CandidateEntry::new(1, "owner", "name", "", "", 0, "https://github.com");
        Self::new(template)?.render(&sample).map(|_| ())
    }

    /// Compiles `template`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Registration`] if the template does not parse.
    pub fn new(template: &str) -> Result<Self, TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(REASON_TEMPLATE_NAME, template)?;
        Ok(Self { handlebars })
    }

    /// Renders the reason for `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Render`], naming the entry, if the template
    /// references an unknown variable.
    pub fn render(&self, entry: &CandidateEntry) -> Result<String, TemplateError> {
        let data = json!({
            "rank": entry.rank,
            "owner": entry.owner,
            "name": entry.name,
            "full_name": entry.full_name,
            "language": entry.language,
            "stars_today": entry.stars_today,
            "total_stars": entry.total_stars,
            "forks": entry.forks,
        });

        self.handlebars
            .render(REASON_TEMPLATE_NAME, &data)
            .map_err(|source| TemplateError::Render {
                rank: entry.rank,
                repository: entry.full_name.clone(),
                source,
            })
    }
}
