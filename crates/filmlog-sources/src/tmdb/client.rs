use async_trait::async_trait;
use filmlog_config::TmdbConfig;
use filmlog_models::{MovieCredits, MovieMetadata};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::SourceError;
use crate::tmdb::api::TmdbMovie;
use crate::tmdb::merge::merge_localized;
use crate::traits::MetadataProvider;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    access_token: String,
    base_url: String,
    primary_language: String,
    fallback_language: String,
}

impl TmdbClient {
    pub fn new(client: Client, access_token: impl Into<String>) -> Self {
        Self {
            client,
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            primary_language: "pt-BR".to_string(),
            fallback_language: "en-US".to_string(),
        }
    }

    /// Build a client with its own HTTP connection pool and per-request timeout
    pub fn from_config(config: &TmdbConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::new(client, config.access_token.clone())
            .with_base_url(config.base_url.clone())
            .with_languages(config.primary_language.clone(), config.fallback_language.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_languages(mut self, primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.primary_language = primary.into();
        self.fallback_language = fallback.into();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.access_token)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                url = %url,
                body = %body,
                "TMDB returned an error response"
            );
            return Err(SourceError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Movie details in one language, with directors resolved from the appended credits
    pub async fn movie(&self, tmdb_id: &str, language: &str) -> Result<MovieMetadata, SourceError> {
        let path = format!("/movie/{}", urlencoding::encode(tmdb_id));
        let movie: TmdbMovie = self
            .get_json(&path, &[("language", language), ("append_to_response", "credits")])
            .await?;
        Ok(MovieMetadata::from(movie))
    }

    async fn movie_localized(&self, tmdb_id: &str, language: &str) -> Result<MovieMetadata, SourceError> {
        self.movie(tmdb_id, language)
            .await
            .map_err(|e| SourceError::Localized {
                tmdb_id: tmdb_id.to_string(),
                language: language.to_string(),
                source: Box::new(e),
            })
    }

    pub async fn movie_credits(&self, tmdb_id: &str) -> Result<MovieCredits, SourceError> {
        let path = format!("/movie/{}/credits", urlencoding::encode(tmdb_id));
        self.get_json(&path, &[]).await
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    fn provider_name(&self) -> &str {
        "tmdb"
    }

    #[instrument(skip(self))]
    async fn enrich(&self, tmdb_id: &str) -> Result<MovieMetadata, SourceError> {
        let primary = self.movie_localized(tmdb_id, &self.primary_language).await?;
        let fallback = self.movie_localized(tmdb_id, &self.fallback_language).await?;
        Ok(merge_localized(primary, fallback))
    }

    #[instrument(skip(self))]
    async fn credits(&self, tmdb_id: &str) -> Result<MovieCredits, SourceError> {
        self.movie_credits(tmdb_id).await
    }
}
