use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use filmlog_api::{build_router, AppState};
use filmlog_config::ServerConfig;
use filmlog_core::{IngestOrchestrator, MemoryWatchStore, WatchStore};
use filmlog_models::{CastMember, MovieCredits, MovieMetadata, MovieWatchEvent};
use filmlog_sources::{FeedReader, FeedSource, MetadataProvider, SourceError};
use http_body_util::BodyExt;
use tempfile::NamedTempFile;
use tower::ServiceExt;

/// Provider answering for TMDB id 965150 only; anything else is a 404
pub struct StubProvider;

#[async_trait]
impl MetadataProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn enrich(&self, tmdb_id: &str) -> Result<MovieMetadata, SourceError> {
        if tmdb_id != "965150" {
            return Err(SourceError::UpstreamStatus {
                status: 404,
                body: String::new(),
            });
        }
        Ok(MovieMetadata {
            director: "Charlotte Wells".to_string(),
            genre: "Drama".to_string(),
            ..MovieMetadata::default()
        })
    }

    async fn credits(&self, tmdb_id: &str) -> Result<MovieCredits, SourceError> {
        if tmdb_id != "965150" {
            return Err(SourceError::UpstreamStatus {
                status: 404,
                body: String::new(),
            });
        }
        Ok(MovieCredits {
            id: 965150,
            cast: vec![CastMember {
                id: 10,
                name: "Paul Mescal".to_string(),
                character: "Calum".to_string(),
                ..CastMember::default()
            }],
            crew: Vec::new(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryWatchStore>,
    // Keeps the feed file alive for the duration of the test
    _feed: NamedTempFile,
}

pub const FEED: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:letterboxd="https://letterboxd.com" xmlns:tmdb="https://themoviedb.org">
  <channel>
    <item>
      <guid isPermaLink="false">letterboxd-watch-1</guid>
      <letterboxd:watchedDate>2024-03-15</letterboxd:watchedDate>
      <letterboxd:filmTitle>Aftersun</letterboxd:filmTitle>
      <letterboxd:filmYear>2022</letterboxd:filmYear>
      <letterboxd:memberRating>4.5</letterboxd:memberRating>
      <tmdb:movieId>965150</tmdb:movieId>
    </item>
    <item>
      <guid isPermaLink="false">letterboxd-watch-2</guid>
      <letterboxd:watchedDate>2024-03-01</letterboxd:watchedDate>
      <letterboxd:filmTitle>Home Movie</letterboxd:filmTitle>
      <letterboxd:filmYear>2019</letterboxd:filmYear>
    </item>
    <item>
      <guid isPermaLink="false">letterboxd-list-3</guid>
      <description>Favourite films</description>
    </item>
  </channel>
</rss>"#;

pub fn build_test_app() -> TestApp {
    let mut feed = NamedTempFile::new().unwrap();
    feed.write_all(FEED.as_bytes()).unwrap();

    let store = Arc::new(MemoryWatchStore::new());
    let provider: Arc<dyn MetadataProvider> = Arc::new(StubProvider);
    let orchestrator = IngestOrchestrator::new(
        FeedReader::new(reqwest::Client::new()),
        store.clone() as Arc<dyn WatchStore>,
        provider.clone(),
    );
    let state = AppState::new(
        orchestrator,
        provider,
        FeedSource::File(feed.path().to_path_buf()),
    );
    let router = build_router(state, &ServerConfig::default()).unwrap();

    TestApp {
        router,
        store,
        _feed: feed,
    }
}

pub async fn seed(store: &MemoryWatchStore, guid: &str, tmdb_id: Option<&str>) {
    let mut event = MovieWatchEvent::draft(guid, "Seeded", "2000");
    event.tmdb_id = tmdb_id.map(str::to_string);
    store.insert(&event).await.unwrap();
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
