//! Reason template error types.

/// Errors from compiling or rendering the recommendation reason.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template could not be compiled.
    #[error("Invalid reason template: {0}")]
    Registration(#[from] handlebars::TemplateError),

    /// Rendering failed for one entry, usually an unknown variable.
    #[error("Failed to render reason for #{rank} {repository}: {source}")]
    Render {
        rank: u32,
        repository: String,
        #[source]
        source: handlebars::RenderError,
    },
}
