use thiserror::Error;

/// Errors that stop the daemon before its first cycle.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// AniList client could not be built
    #[error("Client error: {0}")]
    Client(#[from] anisync_anilist::FetchError),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}
