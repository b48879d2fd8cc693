use filmlog_core::{IngestOrchestrator, WatchStore};
use filmlog_sources::{FeedSource, MetadataProvider};
use std::sync::Arc;

/// Shared state handed to every handler via `State<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WatchStore>,
    pub provider: Arc<dyn MetadataProvider>,
    pub ingest: Arc<IngestOrchestrator>,
    /// Feed ingested by `GET /api/rss`
    pub feed: FeedSource,
}

impl AppState {
    pub fn new(ingest: IngestOrchestrator, provider: Arc<dyn MetadataProvider>, feed: FeedSource) -> Self {
        Self {
            store: ingest.store().clone(),
            provider,
            ingest: Arc::new(ingest),
            feed,
        }
    }
}
