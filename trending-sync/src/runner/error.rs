//! Runner error types.

/// Errors that stop a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The listing could not be fetched.
    #[error(transparent)]
    Fetch(#[from] crate::listing::FetchError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// The reason template could not be compiled or rendered.
    #[error(transparent)]
    Template(#[from] crate::records::TemplateError),

    /// Writing to the destination failed.
    #[error(transparent)]
    Destination(#[from] crate::destination::DestinationError),
}
