pub mod config;
pub mod ingest;
pub mod serve;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use filmlog_config::{Config, PathManager};
use filmlog_core::{MemoryWatchStore, PgWatchStore, WatchStore};
use filmlog_sources::{FeedReader, MetadataProvider, TmdbClient};
use std::sync::Arc;
use std::time::Duration;

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// Load config.toml with environment overrides and validate it.
///
/// `require_tmdb` is false only for runs that never call TMDB.
pub(crate) fn load_config(paths: &PathManager, require_tmdb: bool) -> Result<Config> {
    let config_file = paths.config_file();
    if !config_file.exists() {
        return Err(eyre!(
            "Configuration file not found at {}. Run 'filmlog config init' to create one.",
            config_file.display()
        ));
    }

    let config = Config::load(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate_with(require_tmdb)
        .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

pub(crate) async fn connect_store(config: &Config, in_memory: bool) -> Result<Arc<dyn WatchStore>> {
    if in_memory {
        tracing::warn!("Using in-memory store, nothing will be persisted");
        return Ok(Arc::new(MemoryWatchStore::new()));
    }

    let store = PgWatchStore::connect(&config.database)
        .await
        .wrap_err("Failed to connect to the database")?;
    Ok(Arc::new(store))
}

pub(crate) fn build_provider(config: &Config) -> Result<Arc<dyn MetadataProvider>> {
    let client = TmdbClient::from_config(&config.tmdb).wrap_err("Failed to create TMDB client")?;
    Ok(Arc::new(client))
}

pub(crate) fn build_feed_reader() -> Result<FeedReader> {
    let client = reqwest::Client::builder()
        .timeout(FEED_TIMEOUT)
        .user_agent(concat!("filmlog/", env!("CARGO_PKG_VERSION")))
        .build()
        .wrap_err("Failed to create HTTP client")?;
    Ok(FeedReader::new(client))
}
