//! Record assembly.
//!
//! Turns enriched [`CandidateEntry`] values into the [`OutputRecord`] shape
//! the destination expects.

mod error;
mod reason;
mod record;

pub use error::TemplateError;
pub use reason::{create_handlebars_registry, ReasonRenderer};
pub use record::{OutputRecord, RecordLink};

use crate::listing::CandidateEntry;

/// Maps candidate entries to output records.
pub struct RecordAssembler {
    reason: ReasonRenderer,
}

impl RecordAssembler {
    /// Creates an assembler using `reason_template` for the reason column.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template does not compile.
    pub fn new(reason_template: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            reason: ReasonRenderer::new(reason_template)?,
        })
    }

    /// Builds the output record for one entry.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the reason template cannot be rendered.
    pub fn assemble(&self, entry: &CandidateEntry) -> Result<OutputRecord, TemplateError> {
        let text = if entry.full_name.is_empty() {
            entry.repo_url.clone()
        } else {
            entry.full_name.clone()
        };

        Ok(OutputRecord {
            rank: entry.rank,
            title: entry.full_name.clone(),
            description: entry.description.clone(),
            reason: self.reason.render(entry)?,
            author: entry.owner.clone(),
            link: RecordLink {
                text,
                link: entry.repo_url.clone(),
            },
            language: entry.language.clone(),
            stars_today: entry.stars_today,
            total_stars: entry.total_stars,
            forks: entry.forks,
        })
    }

    /// Builds records for every entry, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns the first [`TemplateError`] encountered.
    pub fn assemble_all(&self, entries: &[CandidateEntry]) -> Result<Vec<OutputRecord>, TemplateError> {
        entries.iter().map(|entry| self.assemble(entry)).collect()
    }
}
