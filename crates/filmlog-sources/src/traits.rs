use async_trait::async_trait;
use filmlog_models::{MovieCredits, MovieMetadata};

use crate::error::SourceError;

/// External movie-information service used to enrich watch events
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Fetch and merge the localized metadata bundle for one movie.
    /// Either every lookup succeeds or the whole call fails.
    async fn enrich(&self, tmdb_id: &str) -> Result<MovieMetadata, SourceError>;

    /// Fetch cast and crew for one movie
    async fn credits(&self, tmdb_id: &str) -> Result<MovieCredits, SourceError>;
}
