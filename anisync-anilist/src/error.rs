/// Errors that can occur while fetching a page from AniList.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Response contained no data")]
    MissingData,

    #[error("Failed to parse page: {source}. Response: {snippet}")]
    Decode {
        #[source]
        source: serde_json::Error,
        snippet: String,
    },
}
