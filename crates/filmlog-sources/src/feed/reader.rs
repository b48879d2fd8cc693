use reqwest::Client;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::feed::parser::{parse_feed, RawFeedEntry};

/// Where the activity feed lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    File(PathBuf),
    Url(String),
}

impl FeedSource {
    /// Interpret a configured location: http(s) URLs are fetched, anything else is a path
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            FeedSource::Url(location.to_string())
        } else {
            FeedSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::File(path) => write!(f, "{}", path.display()),
            FeedSource::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Obtains raw feed bytes and hands back parsed entries
#[derive(Clone)]
pub struct FeedReader {
    client: Client,
}

impl FeedReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch_bytes(&self, source: &FeedSource) -> Result<Vec<u8>, SourceError> {
        let read_error = |message: String| SourceError::FeedRead {
            location: source.to_string(),
            message,
        };

        match source {
            FeedSource::File(path) => {
                debug!("Reading feed file {}", path.display());
                tokio::fs::read(path).await.map_err(|e| read_error(e.to_string()))
            }
            FeedSource::Url(url) => {
                debug!("Fetching feed from {}", url);
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| read_error(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(read_error(format!("HTTP {}", status)));
                }

                let bytes = response.bytes().await.map_err(|e| read_error(e.to_string()))?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Read and parse the whole feed
    pub async fn read(&self, source: &FeedSource) -> Result<Vec<RawFeedEntry>, SourceError> {
        let bytes = self.fetch_bytes(source).await?;
        let entries = parse_feed(&bytes)?;
        info!(
            operation = "feed_read",
            source = %source,
            entries = entries.len(),
            "Read feed"
        );
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_feed_source_parse() {
        assert_eq!(
            FeedSource::parse("https://letterboxd.com/cinephile/rss/"),
            FeedSource::Url("https://letterboxd.com/cinephile/rss/".to_string())
        );
        assert_eq!(
            FeedSource::parse(" /data/export.rss "),
            FeedSource::File(PathBuf::from("/data/export.rss"))
        );
    }

    #[tokio::test]
    async fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "<rss><channel><item><guid>g1</guid><title>Heat</title></item></channel></rss>"
        )
        .unwrap();

        let reader = FeedReader::new(Client::new());
        let entries = reader
            .read(&FeedSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].guid, "g1");
    }

    #[tokio::test]
    async fn test_missing_file_is_feed_read_error() {
        let reader = FeedReader::new(Client::new());
        let err = reader
            .read(&FeedSource::File(PathBuf::from("/nonexistent/filmlog/feed.rss")))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::FeedRead { .. }));
    }
}
