use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The feed document could not be obtained
    #[error("failed to read feed from {location}: {message}")]
    FeedRead { location: String, message: String },

    /// The feed document was obtained but is not well-formed XML
    #[error("failed to parse feed: {0}")]
    FeedParse(String),

    /// Non-success response from the metadata API. Not retried.
    #[error("upstream returned status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// One of the per-language lookups of an enrichment failed
    #[error("{language} lookup failed for TMDB id {tmdb_id}: {source}")]
    Localized {
        tmdb_id: String,
        language: String,
        #[source]
        source: Box<SourceError>,
    },
}

impl SourceError {
    /// HTTP status of an upstream failure, looking through per-language wrappers
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SourceError::UpstreamStatus { status, .. } => Some(*status),
            SourceError::Http(e) => e.status().map(|s| s.as_u16()),
            SourceError::Localized { source, .. } => source.status_code(),
            _ => None,
        }
    }
}
